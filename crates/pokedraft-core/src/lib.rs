// Core of the draft generator: the family model, exclusion lists, the lookup
// seam and the rejection sampler, plus config loading.

pub mod config;
pub mod draft;
pub mod exclusions;
pub mod family;
pub mod lookup;
