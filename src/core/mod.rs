/*-------------------------------------------------------------------------------------------------
  Core Modules
-------------------------------------------------------------------------------------------------*/

pub mod aggregate;
pub mod bogon;
pub mod check;
pub mod diff;
pub mod errors;
pub mod intersect;
pub mod network;
pub mod normalize;
pub mod pipeline;
pub mod prefix_type;
pub mod splitter;
pub mod stats;
pub mod subnet;
pub mod subtract;
