use shared_models::{Notice, NoticeLevel, Notifier};

/// Prints notices to stderr so stdout carries only rendered screens.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        eprintln!("{}", format_notice(&notice));
    }
}

fn format_notice(notice: &Notice) -> String {
    let marker = match notice.level {
        NoticeLevel::Success => "✔",
        NoticeLevel::Info => "ℹ",
        NoticeLevel::Error => "✖",
    };
    format!("{} {}", marker, notice.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_carry_a_level_marker() {
        assert_eq!(format_notice(&Notice::success("Login successful!")), "✔ Login successful!");
        assert_eq!(format_notice(&Notice::error("Image not selected")), "✖ Image not selected");
    }
}
