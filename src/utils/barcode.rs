use crate::cli::Platform;
use crate::config::defs::ValidateError;

/// Barcode fields decoded from the first R1 read of a lane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBarcode {
    pub cell_barcode: String,
    pub umi: String,
    pub poly_t: String,
}

/// Byte slice clamped to the sequence length, so a short read gives a
/// truncated (possibly empty) field instead of an error.
fn field(sequence: &str, start: usize, end: usize) -> String {
    let len = sequence.len();
    let start = start.min(len);
    let end = end.min(len);
    sequence[start..end].to_string()
}

fn tail(sequence: &str, start: usize) -> String {
    field(sequence, start, sequence.len())
}

// inDrop v3 layouts keyed by the 4-base linker at [24, 28). The first
// barcode segment grows 8..=11 bases and every later offset shifts with it.
const INDROP_LAYOUTS: &[(&str, usize)] = &[
    ("CGCC", 8),
    ("ACGC", 9),
    ("GACG", 10),
    ("TGAC", 11),
];

/// Splits a raw barcode-read sequence into (cell barcode, UMI, poly-T)
/// according to the platform's fixed offsets.
pub fn decode(sequence: &str, platform: Platform) -> Result<DecodedBarcode, ValidateError> {
    let umi_len = match platform {
        Platform::TenxV2 => 10,
        Platform::TenxV3 => 12,
        Platform::Indrop => {
            let linker = field(sequence, 24, 28);
            let cb1_len = INDROP_LAYOUTS
                .iter()
                .find(|(tag, _)| *tag == linker)
                .map(|(_, len)| *len)
                .ok_or(ValidateError::UnknownLinker(linker))?;
            let cb2_start = cb1_len + 22;
            let umi_start = cb2_start + 8;
            let poly_t_start = umi_start + 8;
            let mut cell_barcode = field(sequence, 0, cb1_len);
            cell_barcode.push_str(&field(sequence, cb2_start, cb2_start + 8));
            return Ok(DecodedBarcode {
                cell_barcode,
                umi: field(sequence, umi_start, poly_t_start),
                poly_t: tail(sequence, poly_t_start),
            });
        }
    };

    Ok(DecodedBarcode {
        cell_barcode: field(sequence, 0, 16),
        umi: field(sequence, 16, 16 + umi_len),
        poly_t: tail(sequence, 16 + umi_len),
    })
}

/// Identifier the merging pipeline is expected to have written:
/// `@:<cell barcode>:<UMI>:<poly-T>;<original id minus its leading @>`.
pub fn merged_read_id(barcode: &DecodedBarcode, read_id: &str) -> String {
    format!(
        "@:{}:{}:{};{}",
        barcode.cell_barcode,
        barcode.umi,
        barcode.poly_t,
        read_id.strip_prefix('@').unwrap_or(read_id)
    )
}
