// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

pub mod usart;

pub use usart::{Usart, UsartRx, UsartTx};
