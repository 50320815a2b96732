//! Binary-prefix byte count formatting, used in log lines and anywhere a
//! human needs to read a piece/file size. Deliberately a few lines, in
//! keeping with its "glue" share of the overall budget.

const UNITS: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

pub fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64;
    let mut unit_index = 0;
    while value >= 1024.0 && unit_index < UNITS.len() - 1 {
        value /= 1024.0;
        unit_index += 1;
    }

    format!("{value:.2} {}", UNITS[unit_index])
}

#[cfg(test)]
mod tests {
    use super::format_bytes;

    #[test]
    fn small_values_use_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
    }

    #[test]
    fn kibibyte_boundary() {
        assert_eq!(format_bytes(1024), "1.00 KiB");
    }

    #[test]
    fn mebibyte_and_gibibyte() {
        assert_eq!(format_bytes(16 * 1024 * 1024), "16.00 MiB");
        assert_eq!(format_bytes(2 * 1024 * 1024 * 1024), "2.00 GiB");
    }
}
