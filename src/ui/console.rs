use colored::*;

pub struct ConsoleUi;

impl ConsoleUi {
    pub fn write_banner() {
        println!("{}\n", "Android reboot stress test".bright_white().bold());
    }

    pub fn info(msg: &str) {
        println!("{} {}", "[INFO]".bright_blue(), msg);
    }

    pub fn warn(msg: &str) {
        println!("{} {}", "[WARN]".bright_yellow(), msg);
    }

    pub fn error(msg: &str) {
        eprintln!("{} {}", "[ERROR]".bright_red().bold(), msg);
    }

    pub fn success(msg: &str) {
        println!("{}", msg.bright_green());
    }

    pub fn heading(msg: &str) {
        println!("\n{}", msg.bright_cyan().bold());
    }

    pub fn render_device_table(devices: &[crate::adb::Device]) {
        if devices.is_empty() {
            Self::warn("No devices found");
            return;
        }

        let sep = "-".repeat(80);
        println!("{}", sep.bright_black());

        println!(
            "{:<4} {:<20} {:<30} {:<15}",
            "#".bright_cyan(),
            "Serial".bright_cyan(),
            "Device".bright_cyan(),
            "Android".bright_cyan()
        );

        println!("{}", sep.bright_black());

        for (idx, d) in devices.iter().enumerate() {
            let n = format!("{}", idx + 1).bright_white().bold();
            let s = d.serial.bright_white();
            let name = d.display_name().bright_green();
            let ver = d.android_version.as_deref().unwrap_or("Unknown");
            println!("{:<4} {:<20} {:<30} {:<15}", n, s, name, ver.bright_yellow());
        }

        println!("{}", sep.bright_black());
        println!();
    }
}
