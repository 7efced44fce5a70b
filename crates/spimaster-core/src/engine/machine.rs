//! Transaction state machine
//!
//! One call to [`Engine::tick`] is one driving-clock edge. Within a tick the
//! updates happen in a fixed order:
//!
//! 1. reset, which overrides everything else on that tick
//! 2. the config write, gated on the ready level sampled at tick start
//! 3. the edge generator
//! 4. the state machine, consuming the edge the generator just produced
//! 5. the output mux, computed from the new registered state
//!
//! Ready is sampled once at the start of the tick, so a request and a config
//! write on the same tick are both accepted while idle. The config write
//! lands first, and the transaction reads its slave's configuration when it
//! leaves the gap, so the new configuration governs that transaction.

use crate::clock::{EdgeGenerator, EdgeTick};
use crate::config::{ConfigBank, EdgeRole, EngineParams, SlaveConfig, SlaveIndex};
use crate::mux::{self, MuxInputs};
use crate::signals::{BusOutputs, ConfigWrite, TickInputs, TransferRequest};

use super::context::TransactionContext;
use super::state::State;

/// Multi-slave SPI master engine
#[derive(Debug, Clone)]
pub struct Engine {
    params: EngineParams,
    bank: ConfigBank,
    clock: EdgeGenerator,
    state: State,
    gap_count: u32,
    ctx: TransactionContext,
    mosi: bool,
    rx_byte: u8,
    rx_data_valid: bool,
    ticks: u64,
}

impl Engine {
    /// Create an engine with every slave at its power-on configuration
    pub fn new(params: EngineParams) -> Self {
        Self::with_bank(params, ConfigBank::new())
    }

    /// Create an engine with a preloaded configuration bank
    pub fn with_bank(params: EngineParams, bank: ConfigBank) -> Self {
        Self {
            params,
            bank,
            clock: EdgeGenerator::new(&params),
            state: State::Idle,
            gap_count: 0,
            ctx: TransactionContext::default(),
            mosi: false,
            rx_byte: 0,
            rx_data_valid: false,
            ticks: 0,
        }
    }

    /// Engine timing parameters
    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    /// Configuration bank
    pub fn bank(&self) -> &ConfigBank {
        &self.bank
    }

    /// Configuration of `slave` as last accepted
    pub fn read_config(&self, slave: SlaveIndex) -> SlaveConfig {
        self.bank.get(slave)
    }

    /// Current state
    pub fn state(&self) -> State {
        self.state
    }

    /// Transaction in flight, or the last one if idle
    pub fn context(&self) -> &TransactionContext {
        &self.ctx
    }

    /// Bus clock edge generator
    pub fn edge_generator(&self) -> &EdgeGenerator {
        &self.clock
    }

    /// Ticks spent in the gap so far
    pub fn gap_count(&self) -> u32 {
        self.gap_count
    }

    /// Number of ticks since construction
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Whether the engine accepts requests and config writes
    pub fn is_ready(&self) -> bool {
        mux::ready(self.state)
    }

    /// Advance by one driving-clock tick and return the new outputs
    ///
    /// # Reset
    ///
    /// A reset tick ignores every other input. It aborts any transaction
    /// without publishing, but keeps the bank and the last published `rx_byte`.
    pub fn tick(&mut self, inputs: &TickInputs) -> BusOutputs {
        self.ticks += 1;

        if inputs.reset {
            self.reset();
            return self.outputs();
        }

        let ready = self.state.is_ready();
        self.rx_data_valid = false;

        if let Some(write) = inputs.config_write {
            self.write_config(ready, write);
        }

        let edge = self.clock.tick();
        self.step(inputs.transfer_request, inputs.miso, edge);

        self.outputs()
    }

    /// Outputs for the current registered state
    pub fn outputs(&self) -> BusOutputs {
        let driven = mux::drive(&MuxInputs {
            state: self.state,
            bank: &self.bank,
            selected: self.ctx.selected_slave(),
            generated_sclk: self.clock.sclk(),
        });

        BusOutputs {
            ready: driven.ready,
            rx_data_valid: self.rx_data_valid,
            rx_byte: self.rx_byte,
            sclk: driven.sclk,
            chip_selects: driven.chip_selects,
            mosi: self.mosi,
        }
    }

    fn reset(&mut self) {
        if self.state != State::Idle {
            log::debug!(
                "reset in {:?}, dropping transfer to slave {}",
                self.state,
                self.ctx.selected_slave()
            );
        }
        self.state = State::Idle;
        self.gap_count = 0;
        self.ctx = TransactionContext::default();
        self.clock.reset();
        self.mosi = false;
        self.rx_data_valid = false;
    }

    fn write_config(&mut self, ready: bool, write: ConfigWrite) {
        if !ready {
            log::debug!(
                "config write for slave {} dropped: engine busy",
                write.slave
            );
            return;
        }
        log::debug!(
            "slave {} config: mode {}, {:?}, {:?}",
            write.slave,
            write.config.mode().number(),
            write.config.bit_order,
            write.config.cs_polarity
        );
        self.bank.set(write.slave, write.config);
    }

    fn step(&mut self, request: Option<TransferRequest>, miso: bool, tick: EdgeTick) {
        match self.state {
            State::Idle => {
                if let Some(request) = request {
                    self.accept(request);
                }
            }
            State::Gap => {
                if let Some(request) = request {
                    log::debug!("request for slave {} dropped: in gap", request.slave);
                }
                self.gap_count += 1;
                if self.gap_count >= self.params.inactive_gap_ticks() {
                    self.begin_transfer();
                }
            }
            State::Transfer => {
                if let Some(request) = request {
                    log::debug!(
                        "request for slave {} dropped: transferring",
                        request.slave
                    );
                }
                if let Some(edge) = tick.edge {
                    match self.ctx.config().edge_role(edge) {
                        EdgeRole::Shift => {
                            if let Some(level) = self.ctx.shift_out() {
                                self.mosi = level;
                            }
                        }
                        EdgeRole::Sample => self.ctx.sample_in(miso),
                    }
                }
                if !tick.running {
                    self.finish();
                }
            }
        }
    }

    fn accept(&mut self, request: TransferRequest) {
        log::debug!(
            "latched 0x{:02X} for slave {}",
            request.byte,
            request.slave
        );
        self.ctx = TransactionContext::latch(request.slave, request.byte);
        self.gap_count = 0;
        if self.params.inactive_gap_ticks() == 0 {
            self.begin_transfer();
        } else {
            self.state = State::Gap;
        }
    }

    fn begin_transfer(&mut self) {
        let config = self.bank.get(self.ctx.selected_slave());
        self.mosi = self.ctx.begin(config);
        self.clock.start(config.clock_polarity);
        self.state = State::Transfer;
        log::trace!(
            "slave {} transfer start, mode {}",
            self.ctx.selected_slave(),
            config.mode().number()
        );
    }

    fn finish(&mut self) {
        self.rx_byte = self.ctx.rx_partial();
        self.rx_data_valid = true;
        self.ctx.finish();
        self.state = State::Idle;
        log::debug!(
            "slave {}: sent 0x{:02X}, received 0x{:02X}",
            self.ctx.selected_slave(),
            self.ctx.tx_byte(),
            self.rx_byte
        );
    }
}
