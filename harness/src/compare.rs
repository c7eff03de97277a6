/// Decides whether one example's output is acceptable.
///
/// `index` is the example's position in its section. An `Err` carries the
/// text reported for that example.
pub trait Compare {
    fn compare(&self, expected: &str, actual: &str, index: usize) -> Result<(), String>;
}

impl<F> Compare for F
where
    F: Fn(&str, &str, usize) -> Result<(), String>,
{
    fn compare(&self, expected: &str, actual: &str, index: usize) -> Result<(), String> {
        self(expected, actual, index)
    }
}

/// Exact string equality between expected and actual output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Equality;

impl Compare for Equality {
    fn compare(&self, expected: &str, actual: &str, _index: usize) -> Result<(), String> {
        if expected == actual {
            Ok(())
        } else {
            Err(format!(
                "output mismatch\n  expected: {:?}\n  actual:   {:?}",
                expected, actual
            ))
        }
    }
}
