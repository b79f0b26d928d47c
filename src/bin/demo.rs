//! sigmoid-demo: encrypt one scalar, evaluate sigmoid on the ciphertext,
//! decrypt and print the fixed-point result.

use clap::Parser;
use eyre::{Context, Result};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use sigmoid_fhe::{
    decrypt_slot, encrypt_input, evaluate_sigmoid, to_rational, to_signed_rational,
    CoefficientTable, FheContext, SigmoidParams,
};

#[derive(Parser)]
#[command(name = "sigmoid-demo")]
#[command(about = "Homomorphic logistic sigmoid over one BFV-encrypted scalar")]
#[command(version)]
struct Args {
    /// Input in quarter units: the encrypted integer m stands for x = m/4
    #[arg(long, default_value_t = 2)]
    input: i64,

    /// Random seed for deterministic key generation (optional)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => ChaCha20Rng::seed_from_u64(seed),
        None => ChaCha20Rng::from_os_rng(),
    };

    let params = SigmoidParams::default();
    info!(
        degree = params.degree,
        moduli = params.moduli_sizes.len(),
        "initializing BFV context and key material"
    );
    let ctx = FheContext::initialize(&params, &mut rng).context("context initialization failed")?;
    let table =
        CoefficientTable::build(&ctx).context("coefficient table construction failed")?;

    let x = args.input as f64 / params.input_scale as f64;
    info!(input = args.input, x, "encrypting input");
    let encrypted = encrypt_input(&ctx, args.input, &mut rng).context("encryption failed")?;

    info!("evaluating sigmoid homomorphically");
    let evaluated = evaluate_sigmoid(&encrypted, &table, &ctx.relin_key)
        .context("homomorphic evaluation failed")?;

    let result = decrypt_slot(&ctx, &evaluated).context("decryption failed")?;
    let t = ctx.plaintext_modulus();

    println!("Decrypted result (integer): {}", result);
    println!("Decrypted result (decimal): {}", to_rational(result, t));
    info!(
        signed = to_signed_rational(result, t),
        "signed fixed-point interpretation"
    );

    Ok(())
}
