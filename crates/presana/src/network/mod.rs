pub mod normalize;
pub mod types;
pub mod view;

pub use normalize::{CostCell, EdgeRow, unique_edges};
pub use types::{EdgeInfo, EdgeKey, EdgeMap, NetworkResponse, NetworkSnapshot};
pub use view::NetworkTable;
