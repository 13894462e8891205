pub mod barcode;
pub mod fastq;
pub mod file;
pub mod lanes;
