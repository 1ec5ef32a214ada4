//! Bin table for the SKY130 1.8V NMOS device.
//!
//! The foundry model file splits `sky130_fd_pr__nfet_01v8` into binned
//! models `sky130_fd_pr__nfet_01v8__model.<k>`, indexed by a grid of 20
//! width intervals by 9 length intervals with `k = kl + 9 * kw`. All
//! intervals are half-open, inclusive below.

use lazy_static::lazy_static;
use moschar::bins::{BinRange, BinSpec, BinTable};
use moschar::rewrite::BinRewriter;

/// Base model name of the 1.8V NMOS in sky130 netlists.
pub const NFET_01V8_MODEL: &str = "sky130_fd_pr__nfet_01v8__model";

/// Length intervals in microns, indexed by `kl`.
const L_INTERVALS: [(f64, f64); 9] = [
    (20.0, 100.0),
    (8.0, 20.0),
    (4.0, 8.0),
    (2.0, 4.0),
    (1.0, 2.0),
    (0.5, 1.0),
    (0.25, 0.5),
    (0.18, 0.25),
    (0.15, 0.18),
];

/// Width intervals in microns, indexed by `kw`.
const W_INTERVALS: [(f64, f64); 20] = [
    (7.0, 100.0),
    (5.0, 7.0),
    (3.0, 5.0),
    (2.0, 3.0),
    (1.68, 2.0),
    (1.26, 1.68),
    (1.0, 1.26),
    (0.84, 1.0),
    (0.74, 0.84),
    (0.65, 0.74),
    (0.64, 0.65),
    (0.61, 0.64),
    (0.6, 0.61),
    (0.58, 0.6),
    (0.55, 0.58),
    (0.54, 0.55),
    (0.52, 0.54),
    (0.42, 0.52),
    (0.39, 0.42),
    (0.36, 0.39),
];

const MICRON: f64 = 1e-6;

lazy_static! {
    /// The full nfet_01v8 bin table, ranges in meters.
    pub static ref NFET_01V8_BINS: BinTable = nfet_01v8_bins();
}

/// Builds the nfet_01v8 bin table.
pub fn nfet_01v8_bins() -> BinTable {
    let mut bins = Vec::with_capacity(L_INTERVALS.len() * W_INTERVALS.len());
    for (kw, &(w_lo, w_hi)) in W_INTERVALS.iter().enumerate() {
        for (kl, &(l_lo, l_hi)) in L_INTERVALS.iter().enumerate() {
            let id = kl + 9 * kw;
            bins.push(BinSpec::new(
                arcstr::format!("{id}"),
                BinRange::new(w_lo * MICRON, w_hi * MICRON),
                BinRange::new(l_lo * MICRON, l_hi * MICRON),
            ));
        }
    }
    BinTable::new(bins)
}

/// A rewriter preconfigured for sky130 nfet_01v8 netlists.
pub fn nfet_01v8_rewriter() -> BinRewriter {
    BinRewriter::new(NFET_01V8_MODEL, NFET_01V8_BINS.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_well_formed() {
        assert_eq!(NFET_01V8_BINS.len(), 180);
        NFET_01V8_BINS.validate().unwrap();
    }

    #[test]
    fn known_bins() {
        // Reference points from the foundry model file.
        assert_eq!(
            NFET_01V8_BINS.select(0.40e-6, 0.33e-6).unwrap().id,
            "168"
        );
        assert_eq!(
            NFET_01V8_BINS.select(0.36e-6, 0.27e-6).unwrap().id,
            "177"
        );
        // Largest device bin: kw = 0, kl = 0.
        assert_eq!(NFET_01V8_BINS.select(10e-6, 30e-6).unwrap().id, "0");
    }

    #[test]
    fn interval_boundaries() {
        // Lower bounds are inclusive.
        assert_eq!(
            NFET_01V8_BINS
                .select(0.36 * MICRON, 0.15 * MICRON)
                .unwrap()
                .id
                .as_str(),
            format!("{}", 8 + 9 * 19)
        );
        // Upper bounds are exclusive: w = 0.39u belongs to kw = 18.
        assert_eq!(
            NFET_01V8_BINS
                .select(0.39 * MICRON, 0.15 * MICRON)
                .unwrap()
                .id
                .as_str(),
            format!("{}", 8 + 9 * 18)
        );
    }

    #[test]
    fn out_of_range_pairs_have_no_bin() {
        assert!(NFET_01V8_BINS.select(0.30e-6, 0.2e-6).is_none());
        assert!(NFET_01V8_BINS.select(1.0e-6, 0.10e-6).is_none());
        assert!(NFET_01V8_BINS.select(200e-6, 1.0e-6).is_none());
    }

    #[test]
    fn rewrites_sky130_instance() {
        let rw = nfet_01v8_rewriter();
        let input = "M1 drain gate 0 0 sky130_fd_pr__nfet_01v8__model l=0.15u w=0.39u\n";
        let (out, summary) = rw.rewrite_str(input).unwrap();
        assert_eq!(
            out,
            "M1 drain gate 0 0 sky130_fd_pr__nfet_01v8__model.170 l=0.15u w=0.39u\n"
        );
        assert_eq!(summary.binned, 1);
    }
}
