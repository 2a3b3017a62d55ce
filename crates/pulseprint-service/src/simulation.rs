//! Status simulation
//!
//! Produces a demo fleet and advances printer state over time: jobs make
//! progress and finish, temperatures move toward their targets and
//! connecting printers come online. The simulation is deterministic.

use pulseprint_core::{
    FilamentInfo, PrintJob, Printer, PrinterError, PrinterStatus, PrinterTemperatures,
};

const AMBIENT: f64 = 25.0;
const NOZZLE_PRINTING: f64 = 220.0;
const BED_PRINTING: f64 = 60.0;
const CHAMBER_PRINTING: f64 = 35.0;

/// Fraction of the gap to the target temperature closed per second
const HEAT_RATE: f64 = 0.1;

/// Printers used when the service runs in simulation mode
pub fn demo_fleet() -> Vec<Printer> {
    vec![
        Printer::new("sim-x1c", "Workshop X1C")
            .with_model("X1C")
            .with_connection("192.168.1.100", "12345678", "00M09A350100001")
            .with_status(PrinterStatus::Idle)
            .with_filament(FilamentInfo {
                filament_type: "PLA".to_string(),
                color: "#ffffff".to_string(),
                remaining: 85.0,
            }),
        Printer::new("sim-p1s", "Office P1S")
            .with_model("P1S")
            .with_connection("192.168.1.101", "87654321", "01P00A380100002")
            .with_status(PrinterStatus::Printing)
            .with_temperatures(PrinterTemperatures {
                nozzle: NOZZLE_PRINTING,
                bed: BED_PRINTING,
                chamber: CHAMBER_PRINTING,
            })
            .with_print(PrintJob {
                progress: 42.0,
                file_name: "gear_housing.3mf".to_string(),
                layer_current: 84,
                layer_total: 200,
                time_remaining: 4176,
                estimated_total_time: 7200,
            })
            .with_filament(FilamentInfo {
                filament_type: "PETG".to_string(),
                color: "#ff0000".to_string(),
                remaining: 60.0,
            }),
        Printer::new("sim-a1", "Garage A1 mini")
            .with_model("A1 mini")
            .with_connection("192.168.1.102", "11223344", "03000A390100003")
            .with_status(PrinterStatus::Error)
            .with_filament(FilamentInfo {
                filament_type: "PLA".to_string(),
                color: "#00aa00".to_string(),
                remaining: 5.0,
            })
            .with_error(PrinterError {
                print_error: 0x0700_8011,
                error_code: 0x0700_8011,
                stage: 0,
                lifecycle: "product".to_string(),
                gcode_state: "FAILED".to_string(),
                message: "Filament ran out".to_string(),
            }),
        Printer::new("sim-p1p", "Lab P1P")
            .with_model("P1P")
            .with_connection("192.168.1.103", "44332211", "01S00C350100004")
            .with_status(PrinterStatus::Offline),
    ]
}

/// Advance one printer by `elapsed_secs`
///
/// Returns true when anything visible changed.
pub fn advance(printer: &mut Printer, elapsed_secs: f64) -> bool {
    let before = printer.clone();

    match printer.status {
        PrinterStatus::Connecting => printer.status = PrinterStatus::Idle,
        PrinterStatus::Printing => advance_job(printer, elapsed_secs),
        _ => {}
    }

    let target = target_temperatures(printer.status);
    let step = (HEAT_RATE * elapsed_secs).min(1.0);
    let approach = |current: f64, target: f64| {
        let next = current + (target - current) * step;
        if (next - target).abs() < 0.5 {
            target
        } else {
            (next * 10.0).round() / 10.0
        }
    };
    printer.temperatures = PrinterTemperatures {
        nozzle: approach(printer.temperatures.nozzle, target.nozzle),
        bed: approach(printer.temperatures.bed, target.bed),
        chamber: approach(printer.temperatures.chamber, target.chamber),
    };

    printer.normalize();
    let changed = printer.status != before.status
        || printer.temperatures != before.temperatures
        || printer.print != before.print;
    if changed {
        printer.touch();
    }
    changed
}

fn advance_job(printer: &mut Printer, elapsed_secs: f64) {
    let Some(job) = printer.print.as_mut() else {
        return;
    };

    if job.estimated_total_time > 0 {
        let step = elapsed_secs * 100.0 / job.estimated_total_time as f64;
        job.progress = (job.progress + step).min(100.0);
    } else {
        job.progress = 100.0;
    }
    job.time_remaining =
        ((100.0 - job.progress) / 100.0 * job.estimated_total_time as f64).round() as u64;
    job.layer_current = ((job.progress / 100.0) * job.layer_total as f64).floor() as u32;

    if job.is_complete() {
        tracing::info!("Simulated print '{}' finished on {}", job.file_name, printer.name);
        printer.status = PrinterStatus::Idle;
    }
}

fn target_temperatures(status: PrinterStatus) -> PrinterTemperatures {
    match status {
        PrinterStatus::Printing => PrinterTemperatures {
            nozzle: NOZZLE_PRINTING,
            bed: BED_PRINTING,
            chamber: CHAMBER_PRINTING,
        },
        PrinterStatus::Paused => PrinterTemperatures {
            nozzle: NOZZLE_PRINTING - 50.0,
            bed: BED_PRINTING,
            chamber: CHAMBER_PRINTING,
        },
        _ => PrinterTemperatures {
            nozzle: AMBIENT,
            bed: AMBIENT,
            chamber: AMBIENT,
        },
    }
}
