use log::debug;

/// Format the failure message for the encode direction. `index` is the
/// 1-based position along the forward traversal.
pub fn format_convolution_failure(index: usize) -> String {
    format!("Error raised in convolution layer {}", index)
}

/// Format the failure message for the decode direction. `index` is the
/// 1-based position along the reversed traversal.
pub fn format_deconvolution_failure(index: usize) -> String {
    format!("Error raised in deconvolution layer {}", index)
}

pub fn log_convolution_failure(index: usize) {
    debug!("{}", format_convolution_failure(index));
}

pub fn log_deconvolution_failure(index: usize) {
    debug!("{}", format_deconvolution_failure(index));
}

/// Format a message reporting the total number of matrix operations.
pub fn format_total_ops(count: usize) -> String {
    format!("Total matrix ops: {}", count)
}

pub fn log_total_ops(count: usize) {
    log::info!("{}", format_total_ops(count));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_convolution_failure() {
        assert_eq!(
            format_convolution_failure(2),
            "Error raised in convolution layer 2"
        );
    }

    #[test]
    fn test_format_deconvolution_failure() {
        assert_eq!(
            format_deconvolution_failure(1),
            "Error raised in deconvolution layer 1"
        );
    }

    #[test]
    fn test_format_total_ops() {
        assert_eq!(format_total_ops(42), "Total matrix ops: 42");
    }
}
