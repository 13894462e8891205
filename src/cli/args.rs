use clap::{Parser, ValueEnum};

/// Single-cell chemistry determining the barcode/UMI layout of R1.
/// `v2`/`v3` are kept as aliases for the older --kit spelling.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum Platform {
    #[default]
    #[value(name = "10x_v2", alias = "v2")]
    TenxV2,
    #[value(name = "10x_v3", alias = "v3")]
    TenxV3,
    #[value(name = "indrop")]
    Indrop,
}

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "mergecheck", version = "0.1.0")]
pub struct Arguments {

    #[arg(long = "sample", required = true, help = "Sample name prefix: [SAMPLE NAME]_S1_L00[LANE NUMBER]_[READ TYPE]_001.fastq.gz")]
    pub sample_name: String,

    #[arg(long = "barcode", required = true, help = "Directory containing barcode (R1) FASTQ files")]
    pub dir_barcode: String,

    #[arg(long = "genomic", required = true, help = "Directory containing genomic (R2) FASTQ files")]
    pub dir_genomic: String,

    #[arg(long = "platform", required = true, value_enum, help = "Either 10x_v2, 10x_v3, or indrop")]
    pub platform: Platform,

    #[arg(long = "chunk-prefix", default_value = "chunk", help = "Prefix used when splitting the merged FASTQ into chunks. May include a directory component.")]
    pub chunk_prefix: String,

    #[arg(long, default_value_t = 20, help = "Number of parallel chunk searches")]
    pub threads: usize,

    #[arg(long, action, help = "Skip FASTQ files whose names do not match the expected pattern and drop unpaired lanes instead of failing")]
    pub lenient: bool,

    #[arg(short = 'v', long = "verbose", action)]
    pub verbose: bool,
}
