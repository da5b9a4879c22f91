mod dispatch;
mod vehicle;

pub use dispatch::DispatchCommands;
pub use vehicle::VehicleCommands;
