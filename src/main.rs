use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use anyhow::Context;
use log::info;
use pcg_rand::Pcg64;
use rand::SeedableRng;
use structopt::StructOpt;

use abcd_gen::config::GeneratorConfig;
use abcd_gen::params::Params;
use abcd_gen::{edge_writer, generate, sampling};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "abcd-gen",
    about = "Generates ABCD benchmark graphs with ground-truth communities"
)]
struct Opt {
    /// TOML configuration file
    #[structopt(parse(from_os_str))]
    config: PathBuf,

    /// Number of worker threads; defaults to the configuration file or the
    /// available cores
    #[structopt(short = "t", long)]
    num_threads: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opt = Opt::from_args();

    let config = GeneratorConfig::load(&opt.config)
        .with_context(|| format!("reading {}", opt.config.display()))?;

    let mut rng = match config.seed {
        Some(seed) => Pcg64::seed_from_u64(seed),
        None => Pcg64::from_entropy(),
    };

    let degrees = sampling::sample_degrees(
        &mut rng,
        config.t1,
        config.d_min,
        config.d_max,
        config.n,
        config.d_max_iter,
    )
    .context("sampling the degree sequence")?;
    edge_writer::write_sequence(buffered(&config.degreefile)?, &degrees)?;

    let sizes = sampling::sample_community_sizes(
        &mut rng,
        config.t2,
        config.c_min,
        config.c_max,
        config.n,
        config.c_max_iter,
    )
    .context("sampling the community sizes")?;
    edge_writer::write_sequence(buffered(&config.communitysizesfile)?, &sizes)?;

    info!(
        "{} vertices in {} communities, {} engine",
        config.n,
        sizes.len(),
        if config.is_cl {
            "Chung-Lu"
        } else {
            "configuration-model"
        }
    );

    let params = Params::new(
        degrees,
        sizes,
        config.mu,
        config.xi,
        config.is_cl,
        config.is_local,
    )?;
    let num_threads = opt
        .num_threads
        .or(config.num_threads)
        .unwrap_or_else(|| thread::available_parallelism().map_or(1, |p| p.get()));

    let start = Instant::now();
    let graph = generate(&params, &mut rng, num_threads)?;
    info!(
        "{} edges in {:.3}s",
        graph.edges.len(),
        start.elapsed().as_secs_f64()
    );

    edge_writer::write_edge_list(buffered(&config.networkfile)?, &graph.edges)?;
    edge_writer::write_communities(buffered(&config.communityfile)?, &graph.clusters)?;
    Ok(())
}

fn buffered(path: &Path) -> anyhow::Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    Ok(BufWriter::new(file))
}
