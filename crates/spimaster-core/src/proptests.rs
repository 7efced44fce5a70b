//! Randomized end-to-end checks of the engine through the driver

use proptest::prelude::*;
use std::vec::Vec;

use crate::bus::{Peripheral, SpiDriver};
use crate::config::{ConfigBank, EngineParams, SlaveConfig, SlaveIndex, NUM_SLAVES};
use crate::engine::Engine;
use crate::signals::BusOutputs;

/// Loopback that also watches the bus for stray activity
#[derive(Debug)]
struct BusWatcher {
    bank: ConfigBank,
    mosi: bool,
    last_sclk: Option<bool>,
    sclk_toggles: u32,
    stray_selects: u32,
    watched: Option<SlaveIndex>,
}

impl BusWatcher {
    fn new(bank: ConfigBank) -> Self {
        Self {
            bank,
            mosi: false,
            last_sclk: None,
            sclk_toggles: 0,
            stray_selects: 0,
            watched: None,
        }
    }

    fn watch(&mut self, slave: SlaveIndex) {
        self.watched = Some(slave);
        self.last_sclk = None;
        self.sclk_toggles = 0;
    }
}

impl Peripheral for BusWatcher {
    fn miso(&self) -> bool {
        self.mosi
    }

    fn observe(&mut self, outputs: &BusOutputs) {
        self.mosi = outputs.mosi;
        if let Some(prev) = self.last_sclk {
            if prev != outputs.sclk {
                self.sclk_toggles += 1;
            }
        }
        self.last_sclk = Some(outputs.sclk);

        for (slave, config) in self.bank.iter() {
            if Some(slave) == self.watched {
                continue;
            }
            let inactive = config.cs_polarity.inactive_level();
            if outputs.chip_selects.level(slave) != inactive {
                self.stray_selects += 1;
            }
        }
    }
}

fn params() -> impl Strategy<Value = EngineParams> {
    ((1u32..=8), (0u32..=6)).prop_map(|(half, gap)| EngineParams::new(half * 2, gap).unwrap())
}

fn bank() -> impl Strategy<Value = ConfigBank> {
    prop::array::uniform8(0u8..16).prop_map(|raw| {
        let mut bank = ConfigBank::new();
        for (i, bits) in raw.iter().enumerate() {
            let slave = SlaveIndex::new(i as u8).unwrap();
            bank.set(slave, SlaveConfig::from_bits(*bits).unwrap());
        }
        bank
    })
}

fn transfers() -> impl Strategy<Value = Vec<(u8, u8)>> {
    prop::collection::vec((0u8..NUM_SLAVES as u8, any::<u8>()), 1..12)
}

proptest! {
    #[test]
    fn loopback_echoes_every_byte(params in params(), bank in bank(), xfers in transfers()) {
        let engine = Engine::with_bank(params, bank);
        let mut drv = SpiDriver::new(engine, BusWatcher::new(bank));

        for (slave, byte) in xfers {
            let slave = SlaveIndex::new(slave).unwrap();
            drv.peripheral_mut().watch(slave);

            let start = drv.engine().ticks();
            let received = drv.transfer_byte(slave, byte).unwrap();
            let elapsed = drv.engine().ticks() - start;

            prop_assert_eq!(received, byte);
            prop_assert_eq!(elapsed, params.transaction_ticks());
            prop_assert_eq!(drv.peripheral().sclk_toggles, 16);
            prop_assert!(drv.engine().is_ready());
        }
        prop_assert_eq!(drv.peripheral().stray_selects, 0);
    }

    #[test]
    fn sclk_rests_at_polarity(params in params(), bits in 0u8..16, byte in any::<u8>()) {
        let slave = SlaveIndex::new(5).unwrap();
        let config = SlaveConfig::from_bits(bits).unwrap();
        let bank = ConfigBank::new().with(slave, config);
        let mut drv = SpiDriver::new(Engine::with_bank(params, bank), BusWatcher::new(bank));

        drv.transfer_byte(slave, byte).unwrap();
        prop_assert_eq!(drv.engine().outputs().sclk, config.clock_polarity);
        prop_assert_eq!(
            drv.engine().outputs().chip_selects.level(slave),
            config.cs_polarity.inactive_level()
        );
    }
}
