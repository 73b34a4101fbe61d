pub mod lsw;
