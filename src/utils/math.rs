/// Linear interpolation between two values.
///
/// Works for anything supporting `+`, `-` and scalar `*`, including borrowed
/// `nalgebra` vectors: `lerp!(&center, &point, t)`.
#[macro_export]
macro_rules! lerp {
    ($value1:expr, $value2:expr, $t:expr) => {
        $value1 + ($value2 - $value1) * $t
    };
}

pub use lerp;
