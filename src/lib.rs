// Motor control over the ev3dev tacho-motor sysfs interface
//
// Each detected motor shows up as a directory under /sys/class/tacho-motor,
// with one file per readable/writable attribute. This crate resolves which
// motor sits in a logical port, wraps the attribute files in typed
// operations, and validates run commands against the limits of the motor's
// current regulation mode.

pub mod config;
pub mod motor;

pub use motor::{
    Attribute, AttributeStore, DeviceRegistry, Motor, MotorController, MotorError, Port,
    RegulationMode, Result, StopMode,
};
