pub mod dashboard;
pub mod printer_card;
pub mod settings_screen;

pub use dashboard::Dashboard;
pub use printer_card::{PrinterCard, PrinterTable};
pub use settings_screen::SettingsScreen;
