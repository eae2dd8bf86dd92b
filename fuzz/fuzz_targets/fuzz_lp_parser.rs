//! Fuzz target for the LP text reader
//!
//! Arbitrary byte sequences must be rejected with an error, never a panic.
//! Accepted programs must have consistent dimensions.

#![no_main]

use libfuzzer_sys::fuzz_target;
use oxilp_core::protocol::parse_program;

fuzz_target!(|data: &[u8]| {
    if let Ok(lp) = parse_program(data) {
        assert!(lp.num_vars() > 0);
        assert!(lp.num_constraints() > 0);
        for constraint in lp.constraints() {
            assert_eq!(constraint.coeffs.len(), lp.num_vars());
        }
    }
});
