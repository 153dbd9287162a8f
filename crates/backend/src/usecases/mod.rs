pub mod u400_generate_report;
