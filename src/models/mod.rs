pub mod forecast;
pub mod scenario;
pub mod selection;
