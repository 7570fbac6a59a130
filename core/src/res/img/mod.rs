pub mod elka;
