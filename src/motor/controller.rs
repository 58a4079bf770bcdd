// Typed motor operations over the attribute store
//
// Each operation is one attribute access plus integer parse/format. The one
// real decision point is run(): the legal command range and the attribute
// written (speed vs power) depend on the regulation mode the device reports
// at that moment, so the mode is read live and validated against before
// anything is written.

use tracing::{debug, info};

use super::attributes::{Attribute, AttributeStore, MotorError, Result};
use super::registry::Motor;

/// Largest duty-cycle magnitude accepted by the device (percent, signed).
pub const DUTY_CYCLE_LIMIT: i32 = 100;
/// Largest speed magnitude accepted in regulation-on mode (pulses/sec, signed).
pub const REGULATED_SPEED_LIMIT: i32 = 2000;

/// Regulation modes reported by the device
///
/// Off: commands are target power (duty cycle). On: commands are target
/// speed with closed-loop compensation done by the motor driver itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegulationMode {
    Off,
    On,
}

impl RegulationMode {
    /// Textual tag stored in the regulation_mode attribute.
    pub fn as_str(self) -> &'static str {
        match self {
            RegulationMode::Off => "off",
            RegulationMode::On => "on",
        }
    }
}

/// Behavior when the run attribute goes to 0. Device default is coast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopMode {
    Brake,
    Coast,
}

impl StopMode {
    pub fn as_str(self) -> &'static str {
        match self {
            StopMode::Brake => "brake",
            StopMode::Coast => "coast",
        }
    }
}

/// Typed read/write operations for a tacho motor.
///
/// Stateless apart from the store root: nothing about a motor is cached,
/// every call is a fresh attribute access.
#[derive(Debug, Clone, Default)]
pub struct MotorController {
    store: AttributeStore,
}

impl MotorController {
    pub fn new(store: AttributeStore) -> Self {
        Self { store }
    }

    /// Read a numeric attribute as a base-10 integer.
    ///
    /// Non-numeric text is a device/driver fault, surfaced as a parse error.
    fn read_int(&self, motor: &Motor, attribute: Attribute) -> Result<i32> {
        let text = self.store.read(motor.id(), attribute)?;
        text.parse().map_err(|_| MotorError::Parse {
            device: motor.id().to_string(),
            attribute,
            text,
        })
    }

    fn check_range(what: &'static str, value: i32, limit: i32) -> Result<()> {
        if value < -limit || value > limit {
            return Err(MotorError::OutOfRange {
                what,
                value,
                min: -limit,
                max: limit,
            });
        }
        Ok(())
    }

    /// Set the speed setpoint (pulses/sec, signed for direction).
    pub fn write_speed(&self, motor: &Motor, speed: i32) -> Result<()> {
        self.store.write(motor.id(), Attribute::SpeedWrite, speed)
    }

    /// Current measured speed (pulses/sec).
    pub fn read_speed(&self, motor: &Motor) -> Result<i32> {
        self.read_int(motor, Attribute::SpeedRead)
    }

    /// Set the power setpoint (percent, signed for direction).
    pub fn write_power(&self, motor: &Motor, power: i32) -> Result<()> {
        self.store.write(motor.id(), Attribute::PowerWrite, power)
    }

    /// Current applied power (percent).
    pub fn read_power(&self, motor: &Motor) -> Result<i32> {
        self.read_int(motor, Attribute::PowerRead)
    }

    /// Set the duty-cycle setpoint. Rejects values outside [-100, 100]
    /// before anything reaches the device.
    pub fn set_duty_cycle(&self, motor: &Motor, value: i32) -> Result<()> {
        Self::check_range("duty cycle", value, DUTY_CYCLE_LIMIT)?;
        self.store.write(motor.id(), Attribute::DutyCycleWrite, value)
    }

    /// Current measured duty cycle.
    pub fn read_duty_cycle(&self, motor: &Motor) -> Result<i32> {
        self.read_int(motor, Attribute::DutyCycleRead)
    }

    pub fn set_regulation_mode(&self, motor: &Motor, mode: RegulationMode) -> Result<()> {
        self.store
            .write(motor.id(), Attribute::RegulationMode, mode.as_str())
    }

    /// Read the live regulation mode. Never cached: the mode can change
    /// between calls and decides how run commands are interpreted.
    pub fn read_regulation_mode(&self, motor: &Motor) -> Result<RegulationMode> {
        let text = self.store.read(motor.id(), Attribute::RegulationMode)?;
        match text.as_str() {
            "off" => Ok(RegulationMode::Off),
            "on" => Ok(RegulationMode::On),
            _ => Err(MotorError::Parse {
                device: motor.id().to_string(),
                attribute: Attribute::RegulationMode,
                text,
            }),
        }
    }

    /// Make the motor brake actively when stopped.
    pub fn enable_brake_mode(&self, motor: &Motor) -> Result<()> {
        self.store
            .write(motor.id(), Attribute::StopMode, StopMode::Brake.as_str())
    }

    /// Let the motor coast to a halt when stopped (device default).
    pub fn disable_brake_mode(&self, motor: &Motor) -> Result<()> {
        self.store
            .write(motor.id(), Attribute::StopMode, StopMode::Coast.as_str())
    }

    pub fn read_stop_mode(&self, motor: &Motor) -> Result<StopMode> {
        let text = self.store.read(motor.id(), Attribute::StopMode)?;
        match text.as_str() {
            "brake" => Ok(StopMode::Brake),
            "coast" => Ok(StopMode::Coast),
            _ => Err(MotorError::Parse {
                device: motor.id().to_string(),
                attribute: Attribute::StopMode,
                text,
            }),
        }
    }

    /// Current position counter (tacho pulses).
    pub fn current_position(&self, motor: &Motor) -> Result<i32> {
        self.read_int(motor, Attribute::Position)
    }

    /// Reset the position counter to the given value.
    pub fn initialise_position(&self, motor: &Motor, position: i32) -> Result<()> {
        self.store.write(motor.id(), Attribute::Position, position)
    }

    /// Start the motor at the requested speed.
    ///
    /// Reads the live regulation mode and dispatches on it: regulation on
    /// takes a speed setpoint in [-2000, 2000], regulation off takes a power
    /// setpoint in [-100, 100]. Out-of-range requests fail before any write,
    /// leaving device state untouched. The sign picks the direction either
    /// way.
    pub fn run(&self, motor: &Motor, speed: i32) -> Result<()> {
        let mode = self.read_regulation_mode(motor)?;
        debug!("run {}: speed={}, mode={:?}", motor, speed, mode);
        match mode {
            RegulationMode::On => {
                Self::check_range("speed in regulation mode", speed, REGULATED_SPEED_LIMIT)?;
                self.write_speed(motor, speed)?;
            }
            RegulationMode::Off => {
                Self::check_range("speed", speed, DUTY_CYCLE_LIMIT)?;
                self.write_power(motor, speed)?;
            }
        }
        info!("starting motor {}", motor);
        self.store.write(motor.id(), Attribute::Run, 1)
    }

    /// Stop the motor, regardless of mode.
    pub fn stop(&self, motor: &Motor) -> Result<()> {
        info!("stopping motor {}", motor);
        self.store.write(motor.id(), Attribute::Run, 0)
    }
}
