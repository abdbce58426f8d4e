pub mod portfolio_file;
