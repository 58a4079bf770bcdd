// Motor scan: read-only dump of every tacho motor visible in sysfs
//
// This tool does NOT write anything to the motors - it's completely safe.
//
// Usage: cargo run --bin motor_scan -- [root]
// Example: cargo run --bin motor_scan -- /sys/class/tacho-motor

use tacho_motor::config::TACHO_MOTOR_ROOT;
use tacho_motor::motor::{AttributeStore, DeviceRegistry, Motor, MotorController, ALL_PORTS};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup logging (set RUST_LOG=debug to see every attribute access)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("info".parse().unwrap()),
        )
        .init();

    // Get class root from args or use the real sysfs path
    let root = std::env::args()
        .nth(1)
        .unwrap_or_else(|| TACHO_MOTOR_ROOT.to_string());

    println!("Tacho motor scan (read-only)");
    println!("Class root: {}", root);
    println!();

    let store = AttributeStore::new(&root);
    let registry = DeviceRegistry::new(store.clone());
    let controller = MotorController::new(store);

    println!("Step 1: Listing detected motors...");
    let devices = match registry.list_devices() {
        Ok(devices) => devices,
        Err(e) => {
            println!("  x Failed to list devices: {}", e);
            println!();
            println!("Troubleshooting:");
            println!("  - Check the tacho-motor class root exists: {}", root);
            println!("  - Verify the motor driver module is loaded");
            return Err(e.into());
        }
    };
    if devices.is_empty() {
        println!("  No motors detected. Plug a motor in and re-run.");
        return Ok(());
    }
    for device in &devices {
        println!("  + {}", device);
    }
    println!();

    println!("Step 2: Reading motor state...");
    for device in &devices {
        let motor = Motor::new(device.clone());
        print_state(&controller, &motor);
    }
    println!();

    println!("Step 3: Resolving output ports...");
    for port in ALL_PORTS {
        match registry.resolve_port(port)? {
            Some(motor) => println!("  {} -> {}", port, motor),
            None => println!("  {} -> (empty)", port),
        }
    }

    Ok(())
}

fn print_state(controller: &MotorController, motor: &Motor) {
    println!("  {}:", motor);
    match controller.read_regulation_mode(motor) {
        Ok(mode) => println!("    regulation mode: {}", mode.as_str()),
        Err(e) => println!("    regulation mode: unreadable ({})", e),
    }
    match controller.current_position(motor) {
        Ok(position) => println!("    position: {}", position),
        Err(e) => println!("    position: unreadable ({})", e),
    }
    match controller.read_duty_cycle(motor) {
        Ok(duty) => println!("    duty cycle: {}", duty),
        Err(e) => println!("    duty cycle: unreadable ({})", e),
    }
    match controller.read_speed(motor) {
        Ok(speed) => println!("    speed: {}", speed),
        Err(e) => println!("    speed: unreadable ({})", e),
    }
}
