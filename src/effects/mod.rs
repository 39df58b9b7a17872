pub mod composite;
pub mod transitions;
