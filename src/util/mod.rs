pub mod ehex;
