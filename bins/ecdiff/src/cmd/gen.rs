//! Random inputs for differential testing of the alt_bn128 precompiles.
//!
//! Points are drawn from three buckets: the point at infinity, random
//! coordinates that are almost never on the curve, and multiples of the
//! generator. The bucket probabilities are tunable per target.
use super::Error as CmdError;
use crate::output::{write_result, JsonResult};
use alloy_primitives::{hex, uint, U256};
use clap::{Args, Parser, Subcommand};
use precompile::{
    bn128::{FQ_LEN, G1_LEN, G2_LEN, SCALAR_LEN},
    Crypto, DefaultCrypto, PrecompileError, PrecompileId,
};
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use std::io::Write;

/// Order of the G1 and G2 subgroups.
pub const CURVE_ORDER: U256 =
    uint!(0x30644e72e131a029b85045b68181585d2833e84879b9709143e1f593f0000001_U256);

/// Modulus of the base field.
pub const FIELD_MODULUS: U256 =
    uint!(0x30644e72e131a029b85045b68181585d97816a916871ca8d3c208c16d87cfd47_U256);

/// The G1 generator `(1, 2)`.
pub const G1_GENERATOR: [u8; G1_LEN] = {
    let mut point = [0u8; G1_LEN];
    point[FQ_LEN - 1] = 1;
    point[G1_LEN - 1] = 2;
    point
};

/// The G2 generator, encoded imaginary part first.
pub const G2_GENERATOR: [u8; G2_LEN] = hex!(
    "198e9393920d483a7260bfb731fb5d25f1aa493335a9e71297e485b7aef312c2"
    "1800deef121f1e76426a00665e5c4479674322d4f75edadd46debd5cd992f6ed"
    "090689d0585ff075ec9e99ad690c3395bc4b313370b38ef355acdadcd122975b"
    "12c85ea5db8c6deb4aab71808dcb408fe3d1e7690c43d37b4ce6cc0166fa7daa"
);

/// Generate a random input for one of the precompiles
///
/// The input is printed as `{"success": true, "result": "0x..."}` and can be
/// passed as is to the matching precompile command.
#[derive(Parser, Debug)]
pub struct Cmd {
    /// Precompile to generate the input for
    #[command(subcommand)]
    target: Target,
    /// Seed of the random generator. Drawn from the OS when not given
    #[arg(long, global = true)]
    seed: Option<u64>,
}

/// Precompile the input is generated for.
#[derive(Subcommand, Debug)]
pub enum Target {
    /// Two G1 points for ecAdd
    #[command(alias = "add")]
    Ecadd(EcAddArgs),
    /// A G1 point, optionally followed by a scalar, for ecMul
    #[command(alias = "mul")]
    Ecmul(EcMulArgs),
    /// G1/G2 pairs for ecPairing
    #[command(alias = "pairing")]
    Ecpairing(EcPairingArgs),
}

/// Options of `gen ecadd`.
#[derive(Args, Debug, Clone)]
pub struct EcAddArgs {
    /// Probability of generating the point at infinity
    #[arg(long, default_value_t = 0.1)]
    pub infinity_prob: f64,
    /// Probability of generating a point with random coordinates
    #[arg(long, default_value_t = 0.1)]
    pub random_prob: f64,
    /// Probability of using the first point as the second one
    #[arg(long, default_value_t = 0.1)]
    pub double_first_prob: f64,
    /// Probability of negating the first point when it is reused
    #[arg(long, default_value_t = 0.35)]
    pub double_first_neg_prob: f64,
}

/// Options of `gen ecmul`.
///
/// Prints the 64-byte point only, the caller appends its own scalar unless
/// `--scalar` is given.
#[derive(Args, Debug, Clone)]
pub struct EcMulArgs {
    /// Probability of generating the point at infinity
    #[arg(long, default_value_t = 0.1)]
    pub infinity_prob: f64,
    /// Probability of generating a point with random coordinates
    #[arg(long, default_value_t = 0.1)]
    pub random_prob: f64,
    /// Append a 32-byte scalar, making the output a complete 96-byte input
    #[arg(long)]
    pub scalar: bool,
    /// Probability of the appended scalar being 0, 1 or 2
    #[arg(long, default_value_t = 0.3)]
    pub small_scalar_prob: f64,
}

/// Upper bound of `--pairs`.
///
/// Each scalar adds 384 bytes, 768 hex characters, and the result has to fit
/// in a single command line argument (`MAX_ARG_STRLEN`, 128 KiB on Linux).
pub const MAX_PAIRS: u32 = 170;

/// Options of `gen ecpairing`.
#[derive(Args, Debug, Clone)]
pub struct EcPairingArgs {
    /// Probability of generating the point at infinity
    #[arg(long, default_value_t = 0.1)]
    pub infinity_prob: f64,
    /// Probability of generating a point with random coordinates
    #[arg(long, default_value_t = 0.25)]
    pub random_prob: f64,
    /// Number of scalars, each one adds two pairs to the input
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=MAX_PAIRS as i64))]
    pub pairs: u32,
}

/// Input generation errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A probability option is outside `[0, 1]`.
    #[error("--{name} must be a probability between 0 and 1, got {value}")]
    InvalidProbability {
        /// Option name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },
    /// The curve backend rejected a point built from the generator.
    #[error("failed to build curve point: {0}")]
    Curve(#[from] PrecompileError),
    /// The product of the pairing scalars is not invertible.
    #[error("scalar {0} has no inverse modulo the curve order")]
    NoInverse(U256),
}

impl Cmd {
    /// Generates the input and writes it as a JSON line to `out`.
    pub fn run<W: Write>(&self, out: &mut W) -> Result<(), CmdError> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let input = self.target.generate(&mut rng, &DefaultCrypto)?;
        tracing::debug!(
            precompile = %self.target.precompile(),
            seed = ?self.seed,
            input_len = input.len(),
            "generated input"
        );

        write_result(out, &JsonResult::success(input))?;
        Ok(())
    }
}

impl Target {
    /// Returns the precompile the input is meant for.
    pub fn precompile(&self) -> PrecompileId {
        match self {
            Self::Ecadd(_) => PrecompileId::Bn128Add,
            Self::Ecmul(_) => PrecompileId::Bn128Mul,
            Self::Ecpairing(_) => PrecompileId::Bn128Pairing,
        }
    }

    /// Generates a raw precompile input.
    pub fn generate(&self, rng: &mut StdRng, crypto: &dyn Crypto) -> Result<Vec<u8>, Error> {
        match self {
            Self::Ecadd(args) => ecadd(args, rng, crypto),
            Self::Ecmul(args) => ecmul(args, rng, crypto),
            Self::Ecpairing(args) => ecpairing(args, rng, crypto),
        }
    }
}

fn ecadd(args: &EcAddArgs, rng: &mut StdRng, crypto: &dyn Crypto) -> Result<Vec<u8>, Error> {
    let double_prob = probability("double-first-prob", args.double_first_prob)?;
    let neg_prob = probability("double-first-neg-prob", args.double_first_neg_prob)?;
    let mut sampler = Sampler::new(rng, args.infinity_prob, args.random_prob)?;

    let first = sampler.sample();
    let first = sampler.g1(&first, crypto)?;

    let second = if sampler.rng.random_bool(double_prob) {
        if sampler.rng.random_bool(neg_prob) {
            negate_g1(&first)
        } else {
            first
        }
    } else {
        let second = sampler.sample();
        sampler.g1(&second, crypto)?
    };

    Ok([first, second].concat())
}

fn ecmul(args: &EcMulArgs, rng: &mut StdRng, crypto: &dyn Crypto) -> Result<Vec<u8>, Error> {
    let small_prob = probability("small-scalar-prob", args.small_scalar_prob)?;
    let mut sampler = Sampler::new(rng, args.infinity_prob, args.random_prob)?;

    let point = sampler.sample();
    let point = sampler.g1(&point, crypto)?;
    if !args.scalar {
        return Ok(point.to_vec());
    }

    // Any 32 bytes are a valid scalar.
    let scalar: [u8; SCALAR_LEN] = if sampler.rng.random_bool(small_prob) {
        U256::from(sampler.rng.random_range(0..3u8)).to_be_bytes::<SCALAR_LEN>()
    } else {
        sampler.bytes()
    };

    Ok([&point[..], &scalar[..]].concat())
}

fn ecpairing(
    args: &EcPairingArgs,
    rng: &mut StdRng,
    crypto: &dyn Crypto,
) -> Result<Vec<u8>, Error> {
    let mut sampler = Sampler::new(rng, args.infinity_prob, args.random_prob)?;

    let p = sampler.sample();
    let r = sampler.sample();
    let p_point = sampler.g1(&p, crypto)?;
    let r_point = sampler.g2(&r, crypto)?;

    // k_1 * ... * k_n == 1 (mod r)
    let mut scalars: Vec<U256> = (1..args.pairs).map(|_| sampler.scalar()).collect();
    let product = scalars
        .iter()
        .fold(U256::from(1), |acc, k| acc.mul_mod(*k, CURVE_ORDER));
    scalars.push(product.inv_mod(CURVE_ORDER).ok_or(Error::NoInverse(product))?);

    let mut input = Vec::with_capacity(scalars.len() * 2 * (G1_LEN + G2_LEN));
    for k in scalars {
        let q_point = sampler.g1(&p.scaled(k), crypto)?;
        let s_point = sampler.g2(&r.scaled(k), crypto)?;

        input.extend_from_slice(&p_point);
        input.extend_from_slice(&r_point);
        input.extend_from_slice(&q_point);
        input.extend_from_slice(&s_point);
    }
    Ok(input)
}

/// Bucket a point is drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Sample {
    Infinity,
    /// Random coordinates, reduced modulo the field modulus.
    Random,
    /// `k * generator`.
    Multiple(U256),
}

impl Sample {
    /// The sample for `k` times this point. Random coordinates stay random.
    fn scaled(self, k: U256) -> Self {
        match self {
            Self::Multiple(a) => Self::Multiple(a.mul_mod(k, CURVE_ORDER)),
            other => other,
        }
    }
}

struct Sampler<'a> {
    rng: &'a mut StdRng,
    infinity_prob: f64,
    random_prob: f64,
}

impl<'a> Sampler<'a> {
    fn new(rng: &'a mut StdRng, infinity_prob: f64, random_prob: f64) -> Result<Self, Error> {
        Ok(Self {
            rng,
            infinity_prob: probability("infinity-prob", infinity_prob)?,
            random_prob: probability("random-prob", random_prob)?,
        })
    }

    fn sample(&mut self) -> Sample {
        if self.rng.random_bool(self.infinity_prob) {
            Sample::Infinity
        } else if self.rng.random_bool(self.random_prob) {
            Sample::Random
        } else {
            Sample::Multiple(self.scalar())
        }
    }

    /// Random scalar in `[1, r)`.
    fn scalar(&mut self) -> U256 {
        loop {
            let k = U256::from_be_bytes(self.bytes::<32>()).reduce_mod(CURVE_ORDER);
            if !k.is_zero() {
                return k;
            }
        }
    }

    fn bytes<const N: usize>(&mut self) -> [u8; N] {
        let mut bytes = [0u8; N];
        self.rng.fill_bytes(&mut bytes);
        bytes
    }

    /// `N / 32` random field elements.
    fn coordinates<const N: usize>(&mut self) -> [u8; N] {
        let mut bytes = self.bytes::<N>();
        for chunk in bytes.chunks_exact_mut(FQ_LEN) {
            let fq = U256::from_be_slice(chunk).reduce_mod(FIELD_MODULUS);
            chunk.copy_from_slice(&fq.to_be_bytes::<32>());
        }
        bytes
    }

    fn g1(&mut self, sample: &Sample, crypto: &dyn Crypto) -> Result<[u8; G1_LEN], Error> {
        Ok(match sample {
            Sample::Infinity => [0u8; G1_LEN],
            Sample::Random => self.coordinates(),
            Sample::Multiple(k) => crypto.bn128_g1_mul(&G1_GENERATOR, &k.to_be_bytes::<32>())?,
        })
    }

    fn g2(&mut self, sample: &Sample, crypto: &dyn Crypto) -> Result<[u8; G2_LEN], Error> {
        Ok(match sample {
            Sample::Infinity => [0u8; G2_LEN],
            Sample::Random => self.coordinates(),
            Sample::Multiple(k) => crypto.bn128_g2_mul(&G2_GENERATOR, &k.to_be_bytes::<32>())?,
        })
    }
}

fn probability(name: &'static str, value: f64) -> Result<f64, Error> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(Error::InvalidProbability { name, value })
    }
}

/// Negates a G1 point given with coordinates below the field modulus.
fn negate_g1(point: &[u8; G1_LEN]) -> [u8; G1_LEN] {
    let mut negated = *point;
    let y = U256::from_be_slice(&point[FQ_LEN..]);
    let neg_y = (FIELD_MODULUS - y.reduce_mod(FIELD_MODULUS)).reduce_mod(FIELD_MODULUS);
    negated[FQ_LEN..].copy_from_slice(&neg_y.to_be_bytes::<32>());
    negated
}

#[cfg(test)]
mod tests {
    use super::*;
    use precompile::bn128::PAIR_ELEMENT_LEN;
    use rstest::rstest;

    fn target(args: &[&str]) -> Target {
        Cmd::try_parse_from(std::iter::once("gen").chain(args.iter().copied()))
            .unwrap()
            .target
    }

    fn generate(args: &[&str], seed: u64) -> Result<Vec<u8>, Error> {
        target(args).generate(&mut StdRng::seed_from_u64(seed), &DefaultCrypto)
    }

    #[rstest]
    #[case::ecadd(&["ecadd"], 128)]
    #[case::ecmul(&["ecmul"], 64)]
    #[case::ecmul_with_scalar(&["ecmul", "--scalar"], 96)]
    #[case::ecpairing(&["ecpairing"], 2 * PAIR_ELEMENT_LEN)]
    #[case::ecpairing_three(&["pairing", "--pairs", "3"], 6 * PAIR_ELEMENT_LEN)]
    #[case::ecpairing_max(&["pairing", "--pairs", "170"], 340 * PAIR_ELEMENT_LEN)]
    fn input_lengths(#[case] args: &[&str], #[case] len: usize) {
        for seed in 0..16 {
            assert_eq!(generate(args, seed).unwrap().len(), len);
        }
    }

    #[test]
    fn seed_is_reproducible() {
        let run = |seed: u64| {
            let cmd = Cmd::try_parse_from(["gen", "ecpairing", "--seed", &seed.to_string()])
                .unwrap();
            let mut out = Vec::new();
            cmd.run(&mut out).unwrap();
            out
        };
        assert_eq!(run(7), run(7));
        assert_ne!(run(7), run(8));
    }

    #[test]
    fn generator_constants_are_on_curve() {
        let two = U256::from(2).to_be_bytes::<32>();
        let doubled = DefaultCrypto.bn128_g1_mul(&G1_GENERATOR, &two).unwrap();
        let added = DefaultCrypto
            .bn128_g1_add(&G1_GENERATOR, &G1_GENERATOR)
            .unwrap();
        assert_eq!(doubled, added);

        let one = U256::from(1).to_be_bytes::<32>();
        let g2 = DefaultCrypto.bn128_g2_mul(&G2_GENERATOR, &one).unwrap();
        assert_eq!(g2, G2_GENERATOR);
    }

    #[test]
    fn on_curve_points_are_accepted() {
        let no_random = ["--infinity-prob", "0.5", "--random-prob", "0"];
        for seed in 0..8 {
            for name in [&["ecadd"][..], &["ecmul", "--scalar"][..], &["ecpairing"][..]] {
                let target = target(&[name, &no_random[..]].concat());
                let input = target
                    .generate(&mut StdRng::seed_from_u64(seed), &DefaultCrypto)
                    .unwrap();
                assert!(precompile::run(target.precompile(), &input).is_ok());
            }
        }
    }

    #[test]
    fn infinity_only() {
        let input = generate(&["ecadd", "--infinity-prob", "1"], 1).unwrap();
        assert_eq!(input, [0u8; 128]);

        let input = generate(&["ecpairing", "--infinity-prob", "1"], 1).unwrap();
        assert!(input.iter().all(|b| *b == 0));
    }

    #[test]
    fn doubling_the_first_point() {
        let base = [
            "ecadd",
            "--infinity-prob",
            "0",
            "--random-prob",
            "0",
            "--double-first-prob",
            "1",
        ];
        let input = generate(&[&base[..], &["--double-first-neg-prob", "0"][..]].concat(), 3).unwrap();
        assert_eq!(input[..G1_LEN], input[G1_LEN..]);

        let input = generate(&[&base[..], &["--double-first-neg-prob", "1"][..]].concat(), 3).unwrap();
        assert_eq!(input[..FQ_LEN], input[G1_LEN..G1_LEN + FQ_LEN]);
        let sum = precompile::run(PrecompileId::Bn128Add, &input).unwrap();
        assert_eq!(sum.bytes[..], [0u8; G1_LEN]);
    }

    #[test]
    fn random_coordinates_are_reduced() {
        let input = generate(&["ecpairing", "--infinity-prob", "0", "--random-prob", "1"], 5)
            .unwrap();
        for chunk in input.chunks_exact(FQ_LEN) {
            assert!(U256::from_be_slice(chunk) < FIELD_MODULUS);
        }
    }

    #[test]
    fn pairing_points_are_scaled_multiples() {
        let input = generate(
            &["ecpairing", "--infinity-prob", "0", "--random-prob", "0"],
            11,
        )
        .unwrap();
        // A single scalar is the inverse of the empty product, so (P, R) repeats.
        assert_eq!(input[..PAIR_ELEMENT_LEN], input[PAIR_ELEMENT_LEN..]);
    }

    #[test]
    fn negation() {
        let two = U256::from(2).to_be_bytes::<32>();
        let point = DefaultCrypto.bn128_g1_mul(&G1_GENERATOR, &two).unwrap();
        let negated = negate_g1(&point);
        let sum = DefaultCrypto.bn128_g1_add(&point, &negated).unwrap();
        assert_eq!(sum, [0u8; G1_LEN]);
        assert_eq!(negate_g1(&[0u8; G1_LEN]), [0u8; G1_LEN]);
    }

    #[test]
    fn scaled_samples() {
        let k = U256::from(3);
        assert_eq!(Sample::Infinity.scaled(k), Sample::Infinity);
        assert_eq!(Sample::Random.scaled(k), Sample::Random);
        assert_eq!(
            Sample::Multiple(CURVE_ORDER - U256::from(1)).scaled(k),
            Sample::Multiple(CURVE_ORDER - k)
        );
    }

    #[rstest]
    #[case::above_one(&["ecadd", "--infinity-prob", "1.5"])]
    #[case::negative(&["ecmul", "--random-prob=-0.1"])]
    #[case::double(&["ecadd", "--double-first-prob", "2"])]
    #[case::nan(&["ecpairing", "--random-prob", "NaN"])]
    #[case::small_scalar(&["ecmul", "--small-scalar-prob", "1.1"])]
    fn invalid_probability(#[case] args: &[&str]) {
        assert!(matches!(
            generate(args, 0),
            Err(Error::InvalidProbability { .. })
        ));
    }

    #[rstest]
    #[case::zero("0")]
    #[case::above_max("171")]
    #[case::huge("4294967295")]
    fn pairs_out_of_range(#[case] pairs: &str) {
        assert!(Cmd::try_parse_from(["gen", "ecpairing", "--pairs", pairs]).is_err());
    }

    #[test]
    fn ecmul_point_takes_a_caller_scalar() {
        for seed in 0..8 {
            let point = generate(&["ecmul", "--random-prob", "0"], seed).unwrap();
            let input = [&point[..], &[0u8; SCALAR_LEN]].concat();
            let product = precompile::run(PrecompileId::Bn128Mul, &input).unwrap();
            assert_eq!(product.bytes[..], [0u8; G1_LEN]);
        }
    }

    #[test]
    fn small_scalars() {
        let args = ["ecmul", "--scalar", "--small-scalar-prob", "1"];
        let mut seen = [false; 3];
        for seed in 0..64 {
            let input = generate(&args, seed).unwrap();
            let scalar = U256::from_be_slice(&input[G1_LEN..]);
            assert!(scalar < U256::from(3));
            seen[scalar.to::<usize>()] = true;
        }
        assert_eq!(seen, [true; 3]);

        let args = ["ecmul", "--scalar", "--small-scalar-prob", "0"];
        let input = generate(&args, 9).unwrap();
        assert!(U256::from_be_slice(&input[G1_LEN..]) >= U256::from(3));
    }
}
