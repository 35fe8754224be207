/*!
Export of recorded chains. Enable the `csv` feature for [`csv::save_csv`].
*/

#[cfg(feature = "csv")]
pub mod csv;
