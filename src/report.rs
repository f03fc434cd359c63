//! CSV export of training results.

use std::io;

use csv::Writer;

use crate::error::Result;

/// Writes one `episode,reward` row per episode, episodes numbered from 0.
pub fn write_rewards<W: io::Write>(writer: W, rewards: &[f64]) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(["episode", "reward"])?;
    for (episode, reward) in rewards.iter().enumerate() {
        wtr.write_record([episode.to_string(), reward.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_one_row_per_episode() {
        let mut out = Vec::new();
        write_rewards(&mut out, &[0.93, -1.5]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "episode,reward\n0,0.93\n1,-1.5\n");
    }

    #[test]
    fn empty_run_writes_only_the_header() {
        let mut out = Vec::new();
        write_rewards(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "episode,reward\n");
    }
}
