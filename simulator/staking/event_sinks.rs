//! Event sinks for the staking simulator

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, info};
use pos_sim::{Epoch, Event, EventSink, Slot};

// ============================================================================
// Console Logging Sink
// ============================================================================

/// Writes engine events to the log; per-slot events go to debug level
pub struct ConsoleEventSink {
    enabled: bool,
}

impl ConsoleEventSink {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl EventSink for ConsoleEventSink {
    fn log(&mut self, epoch: Epoch, slot: Slot, event: Event) {
        if !self.enabled {
            return;
        }

        match event {
            Event::ValidatorJoined { validator, stake } => {
                info!("{:>3} {:>5} Joined      v:{:x} stake:{:.4}", epoch, slot, validator & 0xFFFF, stake);
            }
            Event::DuplicateRegistration { validator } => {
                info!("{:>3} {:>5} Duplicate   v:{:x}", epoch, slot, validator & 0xFFFF);
            }
            Event::BlockProposed { proposer } => {
                debug!("{:>3} {:>5} Proposed    v:{:x}", epoch, slot, proposer & 0xFFFF);
            }
            Event::ValidatorSlashed { validator, amount } => {
                info!("{:>3} {:>5} Slashed     v:{:x} lost:{:.4}", epoch, slot, validator & 0xFFFF, amount);
            }
            Event::BlockAppended {
                proposer,
                attestations,
            } => {
                debug!(
                    "{:>3} {:>5} Appended    v:{:x} attestations:{}",
                    epoch,
                    slot,
                    proposer & 0xFFFF,
                    attestations
                );
            }
            Event::RewardApplied {
                validator,
                amount,
                bonus,
            } => {
                debug!(
                    "{:>3} {:>5} Reward      v:{:x} {:.6}{}",
                    epoch,
                    slot,
                    validator & 0xFFFF,
                    amount,
                    if bonus { " (bonus)" } else { "" }
                );
            }
            Event::PenaltyApplied { validator, amount } => {
                debug!("{:>3} {:>5} Penalty     v:{:x} {:.6}", epoch, slot, validator & 0xFFFF, amount);
            }
            Event::EpochSettled {
                active_validators,
                reward_pool,
                base_reward,
            } => {
                info!(
                    "{:>3} {:>5} Settled     active:{} pool:{:.6} base:{:.6}",
                    epoch, slot, active_validators, reward_pool, base_reward
                );
            }
            Event::Halted => {
                info!("{:>3} {:>5} Halted", epoch, slot);
            }
        }
    }
}

// ============================================================================
// CSV Event Sink
// ============================================================================

/// CSV event sink for structured data export
pub struct CsvEventSink {
    writer: BufWriter<File>,
}

impl CsvEventSink {
    pub fn new<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "epoch,slot,event_type,validator,amount,count,bonus")?;

        Ok(Self { writer })
    }
}

impl EventSink for CsvEventSink {
    fn log(&mut self, epoch: Epoch, slot: Slot, event: Event) {
        let result = match event {
            Event::ValidatorJoined { validator, stake } => writeln!(
                self.writer,
                "{},{},ValidatorJoined,{},{},0,false",
                epoch, slot, validator, stake
            ),
            Event::DuplicateRegistration { validator } => writeln!(
                self.writer,
                "{},{},DuplicateRegistration,{},0,0,false",
                epoch, slot, validator
            ),
            Event::BlockProposed { proposer } => writeln!(
                self.writer,
                "{},{},BlockProposed,{},0,0,false",
                epoch, slot, proposer
            ),
            Event::ValidatorSlashed { validator, amount } => writeln!(
                self.writer,
                "{},{},ValidatorSlashed,{},{},0,false",
                epoch, slot, validator, amount
            ),
            Event::BlockAppended {
                proposer,
                attestations,
            } => writeln!(
                self.writer,
                "{},{},BlockAppended,{},0,{},false",
                epoch, slot, proposer, attestations
            ),
            Event::RewardApplied {
                validator,
                amount,
                bonus,
            } => writeln!(
                self.writer,
                "{},{},RewardApplied,{},{},0,{}",
                epoch, slot, validator, amount, bonus
            ),
            Event::PenaltyApplied { validator, amount } => writeln!(
                self.writer,
                "{},{},PenaltyApplied,{},{},0,false",
                epoch, slot, validator, amount
            ),
            Event::EpochSettled {
                active_validators,
                reward_pool,
                ..
            } => writeln!(
                self.writer,
                "{},{},EpochSettled,0,{},{},false",
                epoch, slot, reward_pool, active_validators
            ),
            Event::Halted => writeln!(self.writer, "{},{},Halted,0,0,0,false", epoch, slot),
        };

        if let Err(e) = result {
            eprintln!("Error writing to CSV: {}", e);
        }
    }
}

impl Drop for CsvEventSink {
    fn drop(&mut self) {
        let _ = self.writer.flush();
    }
}

// ============================================================================
// Multi Sink (Combine Multiple Sinks)
// ============================================================================

/// Combines multiple event sinks
pub struct MultiEventSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl MultiEventSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add_sink(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }
}

impl EventSink for MultiEventSink {
    fn log(&mut self, epoch: Epoch, slot: Slot, event: Event) {
        for sink in &mut self.sinks {
            sink.log(epoch, slot, event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;

    struct CountingSink(Rc<RefCell<usize>>);

    impl EventSink for CountingSink {
        fn log(&mut self, _epoch: Epoch, _slot: Slot, _event: Event) {
            *self.0.borrow_mut() += 1;
        }
    }

    #[test]
    fn test_csv_rows() {
        let path = std::env::temp_dir().join(format!("stake_sim_events_{}.csv", std::process::id()));
        {
            let mut sink = CsvEventSink::new(&path).unwrap();
            sink.log(0, 3, Event::BlockAppended { proposer: 7, attestations: 2 });
            sink.log(0, 32, Event::RewardApplied { validator: 7, amount: 0.5, bonus: true });
        }

        let content = fs::read_to_string(&path).unwrap();
        let _ = fs::remove_file(&path);
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines[0], "epoch,slot,event_type,validator,amount,count,bonus");
        assert_eq!(lines[1], "0,3,BlockAppended,7,0,2,false");
        assert_eq!(lines[2], "0,32,RewardApplied,7,0.5,0,true");
    }

    #[test]
    fn test_multi_sink_fans_out() {
        let count = Rc::new(RefCell::new(0));
        let mut multi = MultiEventSink::new();
        multi.add_sink(Box::new(CountingSink(count.clone())));
        multi.add_sink(Box::new(CountingSink(count.clone())));

        multi.log(1, 40, Event::Halted);
        assert_eq!(*count.borrow(), 2);
    }
}
