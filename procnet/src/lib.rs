pub use procnet_bv as bv;
pub use procnet_interp as interp;
pub use procnet_ir as ir;
