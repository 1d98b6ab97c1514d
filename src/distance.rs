use ndarray::ArrayView1;
use num_traits::Float;

pub fn euclidean_distance<F: Float>(us: ArrayView1<F>, them: ArrayView1<F>) -> F {
    us.iter()
        .zip(them.iter())
        .map(|(&a, &b)| {
            let diff = a - b;
            diff * diff
        })
        .fold(F::zero(), |acc, sq| acc + sq)
        .sqrt()
}
