use fxp_kernel::{divide, sigmoid, tanh_approx, Q8_24};

// Prints a digest of the kernel's outputs over a fixed input grid so two
// builds (or two platforms' libm) can be compared with a single line.
fn main() {
    let q: i32 = 1 << 24;
    let grid: Vec<i32> = (-32..=32).map(|i| i * (q / 4)).collect();

    let mut bytes = Vec::with_capacity(grid.len() * 4 * 3);
    for &x in &grid {
        bytes.extend_from_slice(&sigmoid(Q8_24(x)).raw().to_le_bytes());
        bytes.extend_from_slice(&tanh_approx(Q8_24(x)).raw().to_le_bytes());
        bytes.extend_from_slice(&divide(Q8_24(x), Q8_24(3 * q)).raw().to_le_bytes());
    }
    let digest = sha256(&bytes);
    println!("Q824_HASH {}", digest);
}

fn sha256(data: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(data);
    let out = hasher.finalize();
    hex::encode(out)
}
