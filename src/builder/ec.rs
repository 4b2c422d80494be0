use crate::common::metadata::{ECLevel, Version};

// Reed-Solomon error correction over GF(2^8)
//------------------------------------------------------------------------------

// Log and exp tables for the field generated by x^8 + x^4 + x^3 + x^2 + 1
const fn build_gf_tables() -> ([u8; 256], [u8; 256]) {
    let mut exp = [0u8; 256];
    let mut log = [0u8; 256];
    let mut val: u16 = 1;
    let mut i = 0;
    while i < 255 {
        exp[i] = val as u8;
        log[val as usize] = i as u8;
        val <<= 1;
        if val >= 256 {
            val ^= 0x11D;
        }
        i += 1;
    }
    exp[255] = exp[0];
    (exp, log)
}

static GF_TABLES: ([u8; 256], [u8; 256]) = build_gf_tables();

fn gf_mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let (exp, log) = (&GF_TABLES.0, &GF_TABLES.1);
    let mut sum = log[a as usize] as usize + log[b as usize] as usize;
    if sum >= 255 {
        sum -= 255;
    }
    exp[sum]
}

/// Splits data codewords into their error correction blocks and computes the
/// EC codewords for each.
pub(crate) fn ecc(data: &[u8], version: Version, ecl: ECLevel) -> (Vec<&[u8]>, Vec<Vec<u8>>) {
    let data_blocks = blockify(data, version, ecl);

    let gen_poly = generator_poly(version.ecc_per_block(ecl));
    let ecc_blocks = data_blocks.iter().map(|b| ecc_for_block(b, &gen_poly)).collect::<Vec<_>>();

    (data_blocks, ecc_blocks)
}

pub(crate) fn blockify(data: &[u8], version: Version, ecl: ECLevel) -> Vec<&[u8]> {
    let (short_size, short_count, long_size, long_count) = version.data_codewords_per_block(ecl);
    let split = short_size * short_count;

    debug_assert!(
        split + long_size * long_count == data.len(),
        "Data len doesn't match total size of blocks: Data len {}, Total block size {}",
        data.len(),
        split + long_size * long_count
    );

    let mut blocks = Vec::with_capacity(short_count + long_count);
    blocks.extend(data[..split].chunks(short_size));
    if long_count > 0 {
        blocks.extend(data[split..].chunks(long_size));
    }
    blocks
}

// Coefficients of the product of (x - α^i) for i in 0..ec_len, log domain,
// leading term excluded
fn generator_poly(ec_len: usize) -> Vec<u8> {
    let (exp, log) = (&GF_TABLES.0, &GF_TABLES.1);
    let mut coeffs: Vec<u8> = vec![1];
    for i in 0..ec_len {
        let alpha = exp[i];
        let mut next = vec![0u8; coeffs.len() + 1];
        for (j, &c) in coeffs.iter().enumerate() {
            next[j] ^= c;
            next[j + 1] ^= gf_mul(c, alpha);
        }
        coeffs = next;
    }
    coeffs[1..].iter().map(|&c| log[c as usize]).collect()
}

// Polynomial long division of the data polynomial by the generator
// polynomial; the remainder coefficients are the ec codewords
fn ecc_for_block(block: &[u8], gen_poly: &[u8]) -> Vec<u8> {
    let len = block.len();
    let (exp, log) = (&GF_TABLES.0, &GF_TABLES.1);

    let mut res = block.to_vec();
    res.resize(len + gen_poly.len(), 0);

    for i in 0..len {
        let lead_coeff = res[i] as usize;
        if lead_coeff == 0 {
            continue;
        }

        let log_lead_coeff = log[lead_coeff] as usize;
        for (u, &g) in res[i + 1..].iter_mut().zip(gen_poly.iter()) {
            let mut log_sum = g as usize + log_lead_coeff;
            if log_sum >= 255 {
                log_sum -= 255;
            }
            *u ^= exp[log_sum];
        }
    }

    res.split_off(len)
}
