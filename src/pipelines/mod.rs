pub mod merge_check;
