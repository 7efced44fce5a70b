//! Output multiplexer
//!
//! Pure functions from the engine's registered state to the externally
//! visible chip select vector, bus clock line and ready flag. Nothing here
//! is stored; the engine recomputes the outputs at the end of every tick.

use crate::config::{ConfigBank, SlaveIndex};
use crate::engine::State;
use crate::signals::ChipSelects;

/// Inputs the mux reads
#[derive(Debug, Clone, Copy)]
pub struct MuxInputs<'a> {
    /// Current transaction state
    pub state: State,
    /// Configuration bank
    pub bank: &'a ConfigBank,
    /// Slave latched by the most recent request
    pub selected: SlaveIndex,
    /// Clock level produced by the edge generator
    pub generated_sclk: bool,
}

/// Outputs the mux drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MuxOutputs {
    /// Chip select lines
    pub chip_selects: ChipSelects,
    /// Bus clock line
    pub sclk: bool,
    /// Ready flag
    pub ready: bool,
}

/// Chip select vector
///
/// Every line rests at its own slave's inactive level; only during a
/// transfer is the selected slave's line driven to its active level.
pub fn chip_selects(state: State, bank: &ConfigBank, selected: SlaveIndex) -> ChipSelects {
    let mut lines = ChipSelects::empty();
    for (slave, config) in bank.iter() {
        let level = if state.is_selecting() && slave == selected {
            config.cs_polarity.active_level()
        } else {
            config.cs_polarity.inactive_level()
        };
        lines.set(ChipSelects::line_of(slave), level);
    }
    lines
}

/// Bus clock line: idle polarity of the selected slave unless transferring
pub fn bus_clock(
    state: State,
    bank: &ConfigBank,
    selected: SlaveIndex,
    generated_sclk: bool,
) -> bool {
    if state.is_selecting() {
        generated_sclk
    } else {
        bank.get(selected).clock_polarity
    }
}

/// Ready flag
pub fn ready(state: State) -> bool {
    state.is_ready()
}

/// Compute all mux outputs
pub fn drive(inputs: &MuxInputs<'_>) -> MuxOutputs {
    MuxOutputs {
        chip_selects: chip_selects(inputs.state, inputs.bank, inputs.selected),
        sclk: bus_clock(
            inputs.state,
            inputs.bank,
            inputs.selected,
            inputs.generated_sclk,
        ),
        ready: ready(inputs.state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BitOrder, CsPolarity, SlaveConfig, SpiMode};

    fn idx(i: u8) -> SlaveIndex {
        SlaveIndex::new(i).unwrap()
    }

    fn mixed_bank() -> ConfigBank {
        let high = SlaveConfig::new(SpiMode::Mode2, BitOrder::MsbFirst, CsPolarity::ActiveHigh);
        ConfigBank::new().with(idx(1), high).with(idx(6), high)
    }

    #[test]
    fn test_idle_lines_follow_own_polarity() {
        let bank = mixed_bank();
        let cs = chip_selects(State::Idle, &bank, idx(1));
        // active-high slaves rest low, active-low slaves rest high
        assert_eq!(cs, ChipSelects::all() - ChipSelects::CS1 - ChipSelects::CS6);
        assert_eq!(chip_selects(State::Gap, &bank, idx(1)), cs);
    }

    #[test]
    fn test_transfer_asserts_only_selected() {
        let bank = mixed_bank();

        let cs = chip_selects(State::Transfer, &bank, idx(1));
        assert_eq!(cs, ChipSelects::all() - ChipSelects::CS6);

        let cs = chip_selects(State::Transfer, &bank, idx(3));
        assert_eq!(
            cs,
            ChipSelects::all() - ChipSelects::CS1 - ChipSelects::CS6 - ChipSelects::CS3
        );
    }

    #[test]
    fn test_bus_clock_selection() {
        let bank = mixed_bank();
        // slave 1 is mode 2: idles high
        assert!(bus_clock(State::Idle, &bank, idx(1), false));
        assert!(bus_clock(State::Gap, &bank, idx(1), false));
        assert!(!bus_clock(State::Transfer, &bank, idx(1), false));
        // slave 0 is mode 0: idles low
        assert!(!bus_clock(State::Idle, &bank, idx(0), true));
        assert!(bus_clock(State::Transfer, &bank, idx(0), true));
    }

    #[test]
    fn test_drive_combines() {
        let bank = ConfigBank::new();
        let out = drive(&MuxInputs {
            state: State::Idle,
            bank: &bank,
            selected: idx(0),
            generated_sclk: true,
        });
        assert!(out.ready);
        assert!(!out.sclk);
        assert_eq!(out.chip_selects, ChipSelects::all());
    }
}
