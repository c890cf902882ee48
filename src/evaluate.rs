//! Evaluation harness: build each circuit, count constraints, check
//! satisfiability, and report timings
//!
//! Every evaluator assembles a circuit from a captured TLS 1.3 session (or
//! synthetic data for the primitive benchmarks), defines it into a
//! [`WitnessBuilder`], and returns an [`EvalReport`]. The CLI aggregates
//! reports over repeated runs and can persist them as JSON.

use std::time::Instant;

use anyhow::{bail, Result};
use p3_field::AbstractField;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::builder::{ConstraintApi, Visibility, WitnessBuilder};
use crate::circuits::{
    AuthTagInputs, AuthenticatedRecord, KdcInputs, Oracle, RecordStatement, RecordVerify,
    SessionCommit, SessionData,
};
use crate::gadgets::bits::{xor_u8, U8};
use crate::gadgets::sha256::Sha256Gadget;
use crate::gadgets::{aes128, disclosure};
use crate::witness;
use crate::F;

/// Build statistics for one circuit evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalReport {
    pub circuit: String,
    pub constraints: usize,
    pub variables: usize,
    pub public_inputs: usize,
    pub private_inputs: usize,
    pub build_ms: f64,
    pub satisfied: bool,
}

/// Mean and standard deviation of build time over repeated runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalSummary {
    pub circuit: String,
    pub iterations: usize,
    pub constraints: usize,
    pub variables: usize,
    pub public_inputs: usize,
    pub private_inputs: usize,
    pub mean_build_ms: f64,
    pub std_build_ms: f64,
    pub satisfied: bool,
}

impl EvalSummary {
    pub fn from_runs(runs: &[EvalReport]) -> Self {
        let n = runs.len();
        let mean = runs.iter().map(|r| r.build_ms).sum::<f64>() / n as f64;
        let var = runs
            .iter()
            .map(|r| (r.build_ms - mean).powi(2))
            .sum::<f64>()
            / n as f64;
        let first = &runs[0];
        EvalSummary {
            circuit: first.circuit.clone(),
            iterations: n,
            constraints: first.constraints,
            variables: first.variables,
            public_inputs: first.public_inputs,
            private_inputs: first.private_inputs,
            mean_build_ms: mean,
            std_build_ms: var.sqrt(),
            satisfied: runs.iter().all(|r| r.satisfied),
        }
    }
}

fn report(name: &str, api: &WitnessBuilder, started: Instant) -> EvalReport {
    let satisfied = api.check().is_ok();
    EvalReport {
        circuit: name.to_string(),
        constraints: api.num_constraints(),
        variables: api.num_variables(),
        public_inputs: api.count_of(Visibility::Public),
        private_inputs: api.count_of(Visibility::Private),
        build_ms: started.elapsed().as_secs_f64() * 1e3,
        satisfied,
    }
}

/// A captured TLS 1.3 session used as the default demo assignment.
pub struct DemoSession {
    pub kdc: KdcInputs,
    pub key: [u8; 16],
    pub commitment: [u8; 32],
    pub tag: AuthTagInputs,
    pub plaintext: Vec<u8>,
    pub statement: RecordStatement,
}

/// Assignment data captured from a real session: the server application
/// traffic key derives from the handshake mid-state, and the record window
/// carries a JSON fragment with a `"price"` label.
pub fn demo_session() -> Result<DemoSession> {
    fn h32(s: &str) -> Result<[u8; 32]> {
        hex::decode(s)?
            .try_into()
            .map_err(|_| anyhow::anyhow!("demo vector length"))
    }

    let kdc = KdcInputs {
        intermediate_hash_hs_opad: h32(
            "5113c2d6533a74ea90392417f726dc79c180819ad8a55bd809a5b38a0858b12f",
        )?,
        dhs_in: witness::dhs_in_padded(&h32(
            "dbd41fabc139fdc0252db510d6d61c4dd09bf913bf4b4534e7a3910d21a13b6b",
        )?),
        ms_in: h32("9be88f33141755dcc1846795217f8cd632559771fbd75fb45033ae0e3adfeefa")?,
        xats_in: h32("dae6d4b1df8df6e1ccb7d90463601475c70c4958ad98c2de07141f8baf77390b")?,
        tk_xapp_in: h32("2feeba2461c64d98bd39a71ee1f20e59e7d85b3d99ad6a0e4fc8e29c3d9e8e0a")?,
    };
    let key = witness::derive_traffic_key(
        &kdc.intermediate_hash_hs_opad,
        &kdc.dhs_in,
        &kdc.ms_in,
        &kdc.xats_in,
        &kdc.tk_xapp_in,
    );
    let commitment = witness::sha256(&key);

    let nonce: [u8; 12] = hex::decode("a54613bf2801a84ce693d0a0")?
        .try_into()
        .map_err(|_| anyhow::anyhow!("demo vector length"))?;
    let plaintext = b"0,561 Euro\"},\"price\":\"38002.2\",\"".to_vec();
    let chunk_index = 32;
    let ciphertext = witness::encrypt_record(&key, &nonce, chunk_index, &plaintext);

    let mut j0 = [0u8; 16];
    j0[..12].copy_from_slice(&nonce);
    j0[12..].copy_from_slice(&1u32.to_be_bytes());
    let tag = AuthTagInputs::new(nonce, witness::aes128_ecb(&key, &[0u8; 16]),
        witness::aes128_ecb(&key, &j0));

    let statement = RecordStatement {
        ciphertext,
        nonce,
        chunk_index,
        substring: b"\"price\"".to_vec(),
        substring_start: 13,
        value_start: 22,
        value_end: 27,
        threshold: 38001,
    };

    Ok(DemoSession {
        kdc,
        key,
        commitment,
        tag,
        plaintext,
        statement,
    })
}

pub fn eval_record() -> Result<EvalReport> {
    let session = demo_session()?;
    let circuit = RecordVerify {
        key: session.key,
        plaintext: session.plaintext,
        statement: session.statement,
    };
    let started = Instant::now();
    let mut api = WitnessBuilder::new();
    circuit.define(&mut api)?;
    Ok(report("record", &api, started))
}

pub fn eval_authtag() -> Result<EvalReport> {
    let session = demo_session()?;
    let circuit = AuthenticatedRecord {
        key: session.key,
        plaintext: session.plaintext,
        statement: session.statement,
        tag: session.tag,
    };
    let started = Instant::now();
    let mut api = WitnessBuilder::new();
    circuit.define(&mut api)?;
    Ok(report("authtag", &api, started))
}

pub fn eval_session_commit() -> Result<EvalReport> {
    let session = demo_session()?;
    let circuit = SessionCommit {
        kdc: session.kdc,
        commitment: session.commitment,
        tag: session.tag,
    };
    let started = Instant::now();
    let mut api = WitnessBuilder::new();
    circuit.define(&mut api)?;
    Ok(report("tls13-session-commit", &api, started))
}

pub fn eval_session_data() -> Result<EvalReport> {
    let session = demo_session()?;
    let circuit = SessionData {
        key: session.key,
        commitment: session.commitment,
        plaintext: session.plaintext,
        statement: session.statement,
    };
    let started = Instant::now();
    let mut api = WitnessBuilder::new();
    circuit.define(&mut api)?;
    Ok(report("tls13-session-data", &api, started))
}

pub fn eval_oracle() -> Result<EvalReport> {
    let session = demo_session()?;
    let circuit = Oracle {
        kdc: session.kdc,
        tag: session.tag,
        plaintext: session.plaintext,
        statement: session.statement,
    };
    let started = Instant::now();
    let mut api = WitnessBuilder::new();
    circuit.define(&mut api)?;
    Ok(report("tls13-oracle", &api, started))
}

pub fn eval_kdc() -> Result<EvalReport> {
    let session = demo_session()?;
    let started = Instant::now();
    let mut api = WitnessBuilder::new();
    let tk = session.kdc.derive(&mut api);
    let expected = crate::circuits::alloc_bytes_public(&mut api, &session.key);
    for (a, b) in tk.iter().zip(expected.iter()) {
        crate::gadgets::bits::assert_u8_equal(&mut api, *a, *b);
    }
    Ok(report("kdc", &api, started))
}

pub fn eval_aes128() -> Result<EvalReport> {
    let key: [u8; 16] = core::array::from_fn(|i| i as u8);
    let pt: Vec<u8> = hex::decode("00112233445566778899aabbccddeeff")?;
    let ct = witness::aes128_ecb(&key, pt.as_slice().try_into()?);

    let started = Instant::now();
    let mut api = WitnessBuilder::new();
    let key_vars: [U8; 16] = crate::circuits::alloc_bytes_private(&mut api, &key)
        .try_into()
        .map_err(|_| anyhow::anyhow!("allocation size"))?;
    let pt_vars: [U8; 16] = crate::circuits::alloc_bytes_public(&mut api, &pt)
        .try_into()
        .map_err(|_| anyhow::anyhow!("allocation size"))?;
    let xk = aes128::expand_key(&mut api, &key_vars);
    let out = aes128::encrypt_block(&mut api, &xk, &pt_vars);
    let expected = crate::circuits::alloc_bytes_public(&mut api, &ct);
    for (a, b) in out.iter().zip(expected.iter()) {
        crate::gadgets::bits::assert_u8_equal(&mut api, *a, *b);
    }
    Ok(report("aes128", &api, started))
}

pub fn eval_sha256(byte_size: usize) -> Result<EvalReport> {
    let data: Vec<u8> = (0..byte_size).map(|i| (i % 251) as u8).collect();
    let digest = witness::sha256(&data);

    let started = Instant::now();
    let mut api = WitnessBuilder::new();
    let msg = crate::circuits::alloc_bytes_private(&mut api, &data);
    let mut hasher = Sha256Gadget::new(&mut api);
    hasher.write(&mut api, &msg);
    let out = hasher.sum(&mut api);
    crate::circuits::assert_digest_equals_public(&mut api, &out, &digest);
    Ok(report("sha256", &api, started))
}

/// Raw compression without padding, SHACAL-2 style: one keyed permutation
/// of a 64-byte block.
pub fn eval_shacal2() -> Result<EvalReport> {
    let block = [0x6bu8; 64];
    let state = witness::intermediate_state(&block);

    let started = Instant::now();
    let mut api = WitnessBuilder::new();
    let msg = crate::circuits::alloc_bytes_private(&mut api, &block);
    let mut hasher = Sha256Gadget::new(&mut api);
    let out = hasher.write_return(&mut api, &msg);
    crate::circuits::assert_digest_equals_public(&mut api, &out, &state);
    Ok(report("shacal2", &api, started))
}

pub fn eval_gcm(byte_size: usize) -> Result<EvalReport> {
    if byte_size % 16 != 0 {
        bail!("gcm byte size must be a multiple of 16, got {byte_size}");
    }
    let key = [0x13u8; 16];
    let nonce = [0x57u8; 12];
    let plaintext: Vec<u8> = (0..byte_size).map(|i| (i * 3) as u8).collect();
    let ciphertext = witness::encrypt_record(&key, &nonce, 2, &plaintext);

    let started = Instant::now();
    let mut api = WitnessBuilder::new();
    let key_vars: [U8; 16] = crate::circuits::alloc_bytes_private(&mut api, &key)
        .try_into()
        .map_err(|_| anyhow::anyhow!("allocation size"))?;
    let nonce_vars: [U8; 12] = crate::circuits::alloc_bytes_public(&mut api, &nonce)
        .try_into()
        .map_err(|_| anyhow::anyhow!("allocation size"))?;
    let chunk_index = api.alloc_public(F::from_canonical_u32(2));
    let pt = crate::circuits::alloc_bytes_private(&mut api, &plaintext);
    let ct = crate::circuits::alloc_bytes_public(&mut api, &ciphertext);
    crate::gadgets::gcm::assert_keystream(&mut api, &key_vars, &nonce_vars, chunk_index, &pt, &ct);
    Ok(report("gcm", &api, started))
}

pub fn eval_xor(byte_size: usize) -> Result<EvalReport> {
    let a: Vec<u8> = (0..byte_size).map(|i| (i * 7) as u8).collect();
    let b: Vec<u8> = (0..byte_size).map(|i| (i * 11 + 5) as u8).collect();
    let c: Vec<u8> = a.iter().zip(b.iter()).map(|(x, y)| x ^ y).collect();

    let started = Instant::now();
    let mut api = WitnessBuilder::new();
    let av = crate::circuits::alloc_bytes_private(&mut api, &a);
    let bv = crate::circuits::alloc_bytes_private(&mut api, &b);
    let cv = crate::circuits::alloc_bytes_public(&mut api, &c);
    for i in 0..byte_size {
        let x = xor_u8(&mut api, av[i], bv[i]);
        crate::gadgets::bits::assert_u8_equal(&mut api, x, cv[i]);
    }
    Ok(report("xor", &api, started))
}

pub fn eval_substring() -> Result<EvalReport> {
    let session = demo_session()?;
    let started = Instant::now();
    let mut api = WitnessBuilder::new();
    let haystack = crate::circuits::alloc_bytes_private(&mut api, &session.plaintext);
    let needle = crate::circuits::alloc_bytes_public(&mut api, &session.statement.substring);
    disclosure::substring_match(
        &mut api,
        &haystack,
        &needle,
        session.statement.substring_start,
    );
    Ok(report("substring", &api, started))
}

pub fn eval_str2int() -> Result<EvalReport> {
    let started = Instant::now();
    let mut api = WitnessBuilder::new();
    let digits = crate::circuits::alloc_bytes_private(&mut api, b"38002");
    let value = disclosure::string_to_int(&mut api, &digits);
    let expected = api.alloc_public(F::from_canonical_u32(38002));
    api.assert_equal(value, expected);
    Ok(report("str2int", &api, started))
}

pub fn eval_gtlt() -> Result<EvalReport> {
    let started = Instant::now();
    let mut api = WitnessBuilder::new();
    let value = api.alloc_private(F::from_canonical_u32(38002));
    let threshold = api.alloc_public(F::from_canonical_u32(38001));
    disclosure::greater_than(&mut api, value, threshold);
    Ok(report("gtlt", &api, started))
}

/// Dispatch by circuit name; `byte_size` feeds the sized primitives.
pub fn evaluate(circuit: &str, byte_size: usize) -> Result<EvalReport> {
    let run = match circuit {
        "record" => eval_record()?,
        "authtag" => eval_authtag()?,
        "tls13-session-commit" => eval_session_commit()?,
        "tls13-session-data" => eval_session_data()?,
        "tls13-oracle" => eval_oracle()?,
        "kdc" => eval_kdc()?,
        "aes128" => eval_aes128()?,
        "sha256" => eval_sha256(byte_size)?,
        "shacal2" => eval_shacal2()?,
        "gcm" => eval_gcm(byte_size)?,
        "xor" => eval_xor(byte_size)?,
        "substring" => eval_substring()?,
        "str2int" => eval_str2int()?,
        "gtlt" => eval_gtlt()?,
        other => bail!("unknown circuit: {other}"),
    };
    info!(
        circuit = %run.circuit,
        constraints = run.constraints,
        variables = run.variables,
        satisfied = run.satisfied,
        "circuit evaluated"
    );
    Ok(run)
}

/// All circuit names accepted by [`evaluate`].
pub const CIRCUITS: &[&str] = &[
    "record",
    "authtag",
    "tls13-session-commit",
    "tls13-session-data",
    "tls13-oracle",
    "kdc",
    "aes128",
    "sha256",
    "shacal2",
    "gcm",
    "xor",
    "substring",
    "str2int",
    "gtlt",
];
