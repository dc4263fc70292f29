pub mod host_coms;
