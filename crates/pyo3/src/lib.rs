mod db;
mod stats;

use pyo3::prelude::*;
use pyo3_stub_gen::define_stub_info_gatherer;
use pyo3_stub_gen::derive::gen_stub_pyfunction;
pub use stats::GameStats;

#[gen_stub_pyfunction]
#[pyfunction]
fn clear_db_cache() {
    db::clear_cache();
}

#[pymodule]
fn gamestats_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<GameStats>()?;
    m.add_function(wrap_pyfunction!(clear_db_cache, m)?)?;

    Ok(())
}

define_stub_info_gatherer!(stub_info);
