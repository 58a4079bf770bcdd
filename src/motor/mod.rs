// Motor control module for tacho motors
//
// Provides:
// - Attribute schema and uncached sysfs attribute I/O
// - Logical port (outA..outD) to device directory resolution
// - Typed controller API with mode-dependent run dispatch

pub mod attributes;
mod controller;
mod registry;

pub use attributes::{Attribute, AttributeStore, MotorError, Result};
pub use controller::{
    MotorController, RegulationMode, StopMode, DUTY_CYCLE_LIMIT, REGULATED_SPEED_LIMIT,
};
pub use registry::{DeviceRegistry, Motor, Port, ALL_PORTS};
