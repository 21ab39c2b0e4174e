pub mod fs_blob_store;
