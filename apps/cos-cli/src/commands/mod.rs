pub mod policy_gate;
pub mod serve;
pub mod stage_gate;
