// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Adafruit-style DC motor shield: a PCA9685 16-channel PWM expander over I²C, with each DC motor
//! wired to one speed channel and two direction channels.
//!
//! The driver is generic over any blocking I²C write implementation, so it carries no HAL types of
//! its own. [`DcMotor`] adapts one shield port to the core's `Actuator` capability through a
//! shared `RefCell` bus, the way the fan and pump both hang off the single shield.

use core::cell::RefCell;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::Write;
use freezeray_core::control::Actuator;

/// Default shield address on the I²C bus.
pub const SHIELD_ADDRESS: u8 = 0x60;

// PCA9685 registers
const MODE1: u8 = 0x00;
const PRESCALE: u8 = 0xFE;
const LED0_ON_L: u8 = 0x06;

// MODE1 bits
const MODE1_SLEEP: u8 = 0x10;
const MODE1_AUTO_INC: u8 = 0x20;
const MODE1_RESTART: u8 = 0x80;

/// Prescaler for the shield's 1.6 kHz PWM: round(25 MHz / (4096 · 1600 Hz)) − 1.
const PRESCALE_1600HZ: u8 = 3;

/// Channel value meaning "fully on" / "fully off" (bit 12 of the ON / OFF register pair).
const FULL: u16 = 0x1000;

/// Shield motor ports and their (speed, in1, in2) PCA9685 channels.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Motor {
    M1,
    M2,
    M3,
    M4,
}

impl Motor {
    fn channels(self) -> (u8, u8, u8) {
        match self {
            Motor::M1 => (8, 10, 9),
            Motor::M2 => (13, 11, 12),
            Motor::M3 => (2, 4, 3),
            Motor::M4 => (7, 5, 6),
        }
    }
}

pub struct MotorShield<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: Write> MotorShield<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Wake the PCA9685, program the 1.6 kHz PWM prescaler, and enable register auto-increment.
    /// The oscillator needs a moment after leaving sleep before a restart is allowed.
    pub fn init(&mut self, delay: &mut impl DelayMs<u8>) -> Result<(), I2C::Error> {
        self.write_reg(MODE1, MODE1_SLEEP)?;
        self.write_reg(PRESCALE, PRESCALE_1600HZ)?;
        self.write_reg(MODE1, MODE1_AUTO_INC)?;
        delay.delay_ms(1);
        self.write_reg(MODE1, MODE1_RESTART | MODE1_AUTO_INC)?;
        Ok(())
    }

    /// Set a motor's PWM duty from a 0–255 level (255 = fully on).
    pub fn set_speed(&mut self, motor: Motor, level: u8) -> Result<(), I2C::Error> {
        let (speed_ch, _, _) = motor.channels();
        match level {
            255 => self.set_channel(speed_ch, FULL, 0),
            _ => self.set_channel(speed_ch, 0, u16::from(level) << 4),
        }
    }

    /// Drive a motor forward. The shield needs the direction pins set before the first speed
    /// write takes effect.
    pub fn run_forward(&mut self, motor: Motor) -> Result<(), I2C::Error> {
        let (_, in1, in2) = motor.channels();
        self.set_pin(in1, true)?;
        self.set_pin(in2, false)
    }

    /// Let a motor coast with both direction pins released.
    pub fn release(&mut self, motor: Motor) -> Result<(), I2C::Error> {
        let (_, in1, in2) = motor.channels();
        self.set_pin(in1, false)?;
        self.set_pin(in2, false)
    }

    fn set_pin(&mut self, channel: u8, high: bool) -> Result<(), I2C::Error> {
        if high {
            self.set_channel(channel, FULL, 0)
        } else {
            self.set_channel(channel, 0, FULL)
        }
    }

    /// Write one channel's ON/OFF register quartet in a single auto-incremented transfer.
    fn set_channel(&mut self, channel: u8, on: u16, off: u16) -> Result<(), I2C::Error> {
        let reg = LED0_ON_L + 4 * channel;
        self.i2c.write(
            self.address,
            &[
                reg,
                (on & 0xFF) as u8,
                (on >> 8) as u8,
                (off & 0xFF) as u8,
                (off >> 8) as u8,
            ],
        )
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), I2C::Error> {
        self.i2c.write(self.address, &[reg, value])
    }
}

/// One motor port viewed as an `Actuator`.
///
/// The port engages forward drive on the first nonzero level and releases to coast when ramped
/// back to zero. Bus errors cannot be surfaced through the capability, so a failed write leaves
/// the previous level in effect until the next ramp step retries.
pub struct DcMotor<'a, I2C> {
    shield: &'a RefCell<MotorShield<I2C>>,
    motor: Motor,
    engaged: bool,
}

impl<'a, I2C: Write> DcMotor<'a, I2C> {
    pub fn new(shield: &'a RefCell<MotorShield<I2C>>, motor: Motor) -> Self {
        Self {
            shield,
            motor,
            engaged: false,
        }
    }
}

impl<'a, I2C: Write> Actuator for DcMotor<'a, I2C> {
    fn set_output_level(&mut self, level: u8) {
        let mut shield = self.shield.borrow_mut();
        if level > 0 && !self.engaged {
            let _ = shield.run_forward(self.motor);
            self.engaged = true;
        }
        let _ = shield.set_speed(self.motor, level);
        if level == 0 && self.engaged {
            let _ = shield.release(self.motor);
            self.engaged = false;
        }
    }
}
