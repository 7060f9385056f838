pub mod material_only;
