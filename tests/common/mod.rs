//! Shared harness for the integration tests
#![allow(dead_code)]

use std::sync::Arc;

use colony::authorization::{call_message, CallAuthorization, EncodedCall};
use colony::common::{Address, ColonyConfig, SkillId, TaskId};
use colony::crypto::{Keypair, SignatureKind};
use colony::reputation::StaticRootOracle;
use colony::{Colony, InMemorySkillRegistry, ManualClock};

pub const COLONY_IDENTITY: Address = Address([0xc0; 20]);

/// Epoch the manual clock starts at
pub const T0: u64 = 1_000_000;

pub struct Harness {
    pub colony: Colony,
    pub clock: ManualClock,
    pub oracle: Arc<StaticRootOracle>,
    pub manager: Keypair,
    pub evaluator: Keypair,
    pub worker: Keypair,
}

pub fn harness() -> Harness {
    harness_with_config(ColonyConfig::default())
}

pub fn harness_with_config(config: ColonyConfig) -> Harness {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let clock = ManualClock::at(T0);
    let oracle = Arc::new(StaticRootOracle::new());
    let colony = Colony::with_clock(
        COLONY_IDENTITY,
        config,
        SkillId(1),
        Arc::new(InMemorySkillRegistry::new()),
        oracle.clone(),
        Arc::new(clock.clone()),
    );
    Harness {
        colony,
        clock,
        oracle,
        manager: Keypair::generate(),
        evaluator: Keypair::generate(),
        worker: Keypair::generate(),
    }
}

/// Sign a call for the given task and nonce, one signature per signer in
/// the registry's slot order
pub fn sign(
    signers: &[&Keypair],
    task: TaskId,
    nonce: u64,
    call: &EncodedCall,
) -> CallAuthorization {
    let message = call_message(task, nonce, call);
    CallAuthorization {
        nonce,
        signatures: signers
            .iter()
            .map(|k| k.sign(&message, SignatureKind::Direct).unwrap())
            .collect(),
    }
}
