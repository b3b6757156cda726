// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! FreezeRay bench controller firmware.
//!
//! Bridges the host serial link to the fan and pump on the motor shield: USART1 carries the
//! command protocol, I²C1 carries the shield's PWM expander. The loop body is one core control
//! tick per [`TICK_MS`], which also fixes the ramp slew rate at one level unit per tick.

#![no_main]
#![no_std]

use cortex_m_rt::entry;
#[cfg(not(feature = "debug"))]
use panic_halt as _;
#[cfg(feature = "debug")]
use {defmt_rtt as _, panic_probe as _};

use core::cell::RefCell;

use cortex_m::delay::Delay;
use hal::{
    i2c::{BlockingI2c, Mode as I2cMode},
    pac,
    prelude::*,
    serial::{Config, Serial},
};
use stm32f7xx_hal as hal;

use freezeray_core::control::{RampStatus, ReplyTerminator};
use freezeray_core::device::Device;

mod drivers;
mod hw;

use drivers::{motor_shield::SHIELD_ADDRESS, DcMotor, Motor, MotorShield};
use hw::Usart;

/// Control tick period. One ramp unit per tick: a full 0→255 swing takes ~2.6 s.
const TICK_MS: u32 = 10;

#[entry]
fn main() -> ! {
    // Peripherals
    let cp = pac::CorePeripherals::take().unwrap();
    let dp = pac::Peripherals::take().unwrap();

    // Clocks
    let rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze();
    let mut apb1 = rcc.apb1;

    // GPIO
    let gpioa = dp.GPIOA.split();
    let gpiob = dp.GPIOB.split();
    let gpiod = dp.GPIOD.split();

    // Ramp activity LED (active low)
    let mut led_act = gpiod.pd10.into_push_pull_output();
    led_act.set_high();

    // USART1 to the host
    let tx = gpioa.pa9.into_alternate::<7>();
    let rx = gpioa.pa10.into_alternate::<7>();
    let usart_cfg = Config {
        baud_rate: 9_600.bps(),
        ..Default::default()
    };
    let serial = Serial::new(dp.USART1, (tx, rx), &clocks, usart_cfg);
    let mut port = Usart::new(serial);

    // I2C1 to the motor shield
    let scl = gpiob.pb8.into_alternate_open_drain::<4>();
    let sda = gpiob.pb9.into_alternate_open_drain::<4>();
    let i2c = BlockingI2c::i2c1(
        dp.I2C1,
        (scl, sda),
        I2cMode::standard(100_000.Hz()),
        clocks,
        &mut apb1,
        50_000,
    );

    let mut delay = Delay::new(cp.SYST, clocks.sysclk().raw());

    // Shield bring-up: both motors at zero, coasting, until the first command.
    let shield = RefCell::new(MotorShield::new(i2c, SHIELD_ADDRESS));
    {
        let mut shield = shield.borrow_mut();
        shield.init(&mut delay).unwrap();
        for motor in [Motor::M1, Motor::M3] {
            shield.set_speed(motor, 0).unwrap();
            shield.release(motor).unwrap();
        }
    }
    let mut fan = DcMotor::new(&shield, Motor::M1);
    let mut pump = DcMotor::new(&shield, Motor::M3);

    let mut device = Device::new(ReplyTerminator::Etx);

    port.tx.println("FreezeRay communication established!");

    #[cfg(feature = "debug")]
    defmt::info!("entering control loop, tick {} ms", TICK_MS);

    loop {
        delay.delay_ms(TICK_MS);
        port.rx.poll();

        let report = device.tick(&mut port.rx, &mut port.tx, &mut fan, &mut pump);

        let ramping =
            report.fan == RampStatus::Stepping || report.pump == RampStatus::Stepping;
        if ramping {
            led_act.set_low();
        } else {
            led_act.set_high();
        }

        #[cfg(feature = "debug")]
        if report.dispatched {
            defmt::info!(
                "dispatched command: fan {}/{} pump {}/{}",
                device.fan().current(),
                device.fan().target(),
                device.pump().current(),
                device.pump().target()
            );
        }
    }
}
