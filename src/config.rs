// Sysfs layout for the tacho-motor class

// Root directory holding one subdirectory per detected motor.
// Tests point an AttributeStore at a temp dir instead.
pub const TACHO_MOTOR_ROOT: &str = "/sys/class/tacho-motor";
