use nalgebra::DVector;
use std::error::Error;

use crate::data::dataset::RealNumber;

/// Euclidean (L2) distance between two vectors of equal length.
pub fn euclidean_distance<T: RealNumber>(
    a: &DVector<T>,
    b: &DVector<T>,
) -> Result<T, Box<dyn Error>> {
    if a.len() != b.len() {
        return Err("Vectors are of different sizes.".into());
    }

    let mut sum = T::from_f64(0.0).unwrap();
    for (x, y) in a.iter().zip(b.iter()) {
        let diff = *x - *y;
        sum += diff * diff;
    }

    Ok(sum.sqrt())
}
