/*!
# Saving chains to CSV

Enable via the `csv` feature.
*/

use std::error::Error;
use std::fmt::Display;
use std::fs::File;

use csv::Writer;

use crate::core::ChainRun;

/**
Saves the recorded nodes of one or more chains as a CSV file.

The resulting file has a header row `chain,node,value,dim_0,...,dim_{d-1}`,
where `d` is the length of the first recorded state, followed by one row per
recorded node in chain order. Without any recorded node the file holds just
`chain,node,value`.

# Examples

```rust
use argmax_mcmc::core::{run, ChainOptions};
use argmax_mcmc::io::csv::save_csv;
use argmax_mcmc::lattice::{Lattice, LatticeWalk};
use rand::rngs::SmallRng;
use rand::SeedableRng;

let walk = LatticeWalk::new(Lattice::new(vec![10, 10]).unwrap(), 1.0).unwrap();
let objective = |x: &Vec<usize>| -((x[0] * x[0] + x[1] * x[1]) as f64);
let mut rng = SmallRng::seed_from_u64(0);
let chain = run(objective, walk, vec![9, 9], ChainOptions::lattice_search(0.01), &mut rng)?;

save_csv(&[chain], "/tmp/lattice_chain.csv")?;
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/
pub fn save_csv<T: Display>(
    runs: &[ChainRun<Vec<T>>],
    filename: &str,
) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_writer(File::create(filename)?);
    let n_dims = runs
        .iter()
        .find_map(|run| run.chain.first())
        .map_or(0, |node| node.state.len());

    let mut header: Vec<String> = vec!["chain".into(), "node".into(), "value".into()];
    header.extend((0..n_dims).map(|i| format!("dim_{i}")));
    wtr.write_record(&header)?;

    for (chain_idx, run) in runs.iter().enumerate() {
        for (node_idx, node) in run.chain.iter().enumerate() {
            if node.state.len() != n_dims {
                return Err(format!(
                    "chain {chain_idx}, node {node_idx}: expected {n_dims} coordinates, found {}",
                    node.state.len()
                )
                .into());
            }
            let mut row = vec![
                chain_idx.to_string(),
                node_idx.to_string(),
                node.value.to_string(),
            ];
            row.extend(node.state.iter().map(|v| v.to_string()));
            wtr.write_record(&row)?;
        }
    }

    wtr.flush()?;
    Ok(())
}
