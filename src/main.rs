// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! Humper firmware entry point.
//!
//! Interrupt map:
//!
//! | Source | Work |
//! | ------ | ---- |
//! | TIM7 | velocity tick: encoder sample, PID step, H-bridge |
//! | SysTick (1 kHz) | ranging cadence, echo timeout, servo settle window |
//! | TIM6 | end of the HC-SR04 trigger pulse |
//! | EXTI1 | echo edges; a finished echo sends a status frame |
//! | EXTI15_10 | SW1 inverts the legs, SW2 terminates the run |
//! | USART2 | leg command bytes from the host |
//! | USART1 | setpoint lines for the motor, in tenths of a degree |
//!
//! Handlers only update driver state and queue output. Status frames, console echo and
//! readouts go through [`Outbox`] queues, and the idle loop owns both transmit halves and does
//! the blocking writes with interrupts enabled.
//!
//! The resistive touchscreen driver (`humper::drivers::touchscreen`) is library-only. This
//! board has no panel wired to an ADC, so no handler feeds it.

#![no_main]
#![no_std]

use core::{
    fmt::Write,
    sync::atomic::{AtomicU32, Ordering},
};

use cortex_m::peripheral::{syst::SystClkSource, NVIC};
use cortex_m_rt::{entry, exception};
use defmt_rtt as _;
use fugit::{HertzU32, MicrosDurationU32};
use heapless::Vec;
use panic_halt as _;

use hal::{
    gpio::{gpiob, gpiod, Floating, Input, Output, PushPull},
    pac::{self, interrupt},
    prelude::*,
    serial::{self, Config, Serial},
};
use stm32f7xx_hal as hal;

use humper::{
    config,
    control::{EncoderConfig, EncoderTracker, Pid, PidConfig, PositionController},
    drivers::{EchoRanger, HBridge, RangerConfig},
    hw::{
        exti::{self, Edge, Port},
        pins::ButtonPins,
        BoardPins, EchoClock, Encoder, InPin, Indicator, Led, OutPin, PulseClock, PwmChannel,
        PwmTimer, QeiEncoder, Signal, TickTimer, Usart, UsartRx,
    },
    motors::QuadGait,
    protocol::{Report, SetpointParser, StatusFrame},
    Humper, Outbox, RangeError, Shared,
};

type Motor = PositionController<
    PwmChannel<pac::TIM4, 1>,
    OutPin<gpiod::PD13<Output<PushPull>>>,
    OutPin<gpiod::PD14<Output<PushPull>>>,
>;

type Ranger = EchoRanger<
    OutPin<gpiob::PB0<Output<PushPull>>>,
    InPin<gpiob::PB1<Input<Floating>>>,
    EchoClock,
    PulseClock,
>;

type Robot = Humper<
    PwmChannel<pac::TIM3, 1>,
    PwmChannel<pac::TIM3, 2>,
    PwmChannel<pac::TIM3, 3>,
    PwmChannel<pac::TIM3, 4>,
>;

type Rgb = Indicator<
    OutPin<gpiod::PD8<Output<PushPull>>>,
    OutPin<gpiod::PD10<Output<PushPull>>>,
    OutPin<gpiod::PD9<Output<PushPull>>>,
>;

struct MotorLoop {
    encoder: QeiEncoder,
    controller: Motor,
}

struct Console {
    rx: UsartRx<pac::USART1>,
    parser: SetpointParser,
}

const ECHO_LINE: u8 = 1;
const SW1_LINE: u8 = 13;
const SW2_LINE: u8 = 12;

static MOTOR: Shared<MotorLoop> = Shared::new();
static RANGER: Shared<Ranger> = Shared::new();
static ROBOT: Shared<Robot> = Shared::new();
static LINK: Shared<UsartRx<pac::USART2>> = Shared::new();
static CONSOLE: Shared<Console> = Shared::new();
static INDICATOR: Shared<Rgb> = Shared::new();
static BUTTONS: Shared<ButtonPins> = Shared::new();

static FRAMES: Outbox<StatusFrame, 4> = Outbox::new();
static REPORTS: Outbox<Report, 4> = Outbox::new();
static TYPED: Outbox<u8, 64> = Outbox::new();

/// Milliseconds until the next ranging cycle.
static RANGE_COUNTDOWN: AtomicU32 = AtomicU32::new(config::SERVO_SETTLE_MS);

#[entry]
fn main() -> ! {
    // Peripherals
    let dp = pac::Peripherals::take().unwrap();
    let mut cp = cortex_m::Peripherals::take().unwrap();

    // Clocks: 80 MHz core, timer kernels at 80 MHz
    let rcc = dp.RCC.constrain();
    let clocks = rcc
        .cfgr
        .use_pll()
        .sysclk(80.MHz())
        .pclk1(40.MHz())
        .pclk2(80.MHz())
        .freeze();
    let timclk = clocks.timclk1();

    let pins = BoardPins::new(dp.GPIOA, dp.GPIOB, dp.GPIOC, dp.GPIOD);

    // LEDs
    let rgb = Indicator::new(
        Led::active_high(OutPin::new(pins.leds.red)),
        Led::active_high(OutPin::new(pins.leds.green)),
        Led::active_high(OutPin::new(pins.leds.blue)),
    );

    // USART1 (DBG) and USART2 (host link)
    let usart_cfg = Config {
        baud_rate: config::UART_BAUD.bps(),
        ..Default::default()
    };
    let mut serial1 = Serial::new(
        dp.USART1,
        (pins.usart1.tx, pins.usart1.rx),
        &clocks,
        usart_cfg,
    );
    serial1.listen(serial::Event::Rxne);
    let (mut console, console_rx) = Usart::split(serial1);

    let usart_cfg = Config {
        baud_rate: config::UART_BAUD.bps(),
        ..Default::default()
    };
    let mut serial2 = Serial::new(
        dp.USART2,
        (pins.usart2.tx, pins.usart2.rx),
        &clocks,
        usart_cfg,
    );
    serial2.listen(serial::Event::Rxne);
    let (mut link, link_rx) = Usart::split(serial2);

    console.println("humper: boot");

    // Motor: TIM2 encoder, TIM4_CH1 PWM, PD13/PD14 direction
    let encoder = QeiEncoder::new(Encoder::tim2(dp.TIM2, config::CENTER_POSITION));
    let (motor_pwm, _, _, _) = PwmTimer::tim4(
        dp.TIM4,
        timclk,
        HertzU32::from_raw(config::MOTOR_PWM_HZ),
    )
    .split();
    let bridge = HBridge::new(
        motor_pwm,
        OutPin::new(pins.motor.fwd),
        OutPin::new(pins.motor.rev),
    )
    .unwrap();
    let tracker = EncoderTracker::new(EncoderConfig::default()).unwrap();
    let pid = Pid::new(PidConfig::shift_pi()).unwrap();
    let mut controller = PositionController::new(tracker, pid, bridge);
    controller.set_target_tenths(
        config::CENTER_POSITION,
        i32::from(config::DEFAULT_TARGET_DEG) * 10,
    );

    // Legs: TIM3 CH1..CH4
    let (rf, rb, lf, lb) = PwmTimer::tim3(dp.TIM3, timclk, HertzU32::from_raw(config::SERVO_PWM_HZ))
        .split();
    let mut robot = Humper::new(QuadGait::new(rf, rb, lf, lb));
    robot.apply_commands(&[0x00]).unwrap();

    // Ranger: PB0 trigger, PB1 echo, TIM5 echo clock, TIM6 trigger pulse
    let ranger = EchoRanger::new(
        OutPin::new(pins.ranger.trigger),
        InPin::new(pins.ranger.echo),
        EchoClock::tim5(dp.TIM5, timclk, HertzU32::from_raw(config::ECHO_TIMER_HZ)),
        PulseClock::tim6(
            dp.TIM6,
            timclk,
            MicrosDurationU32::from_ticks(config::TRIGGER_PULSE_US),
        ),
        RangerConfig::default(),
    )
    .unwrap();

    exti::listen(Port::B, ECHO_LINE, Edge::Both);
    exti::listen(Port::C, SW1_LINE, Edge::Falling);
    exti::listen(Port::C, SW2_LINE, Edge::Falling);

    // Hand everything over to interrupt context
    MOTOR.install(MotorLoop {
        encoder,
        controller,
    });
    RANGER.install(ranger);
    ROBOT.install(robot);
    LINK.install(link_rx);
    CONSOLE.install(Console {
        rx: console_rx,
        parser: SetpointParser::new(),
    });
    INDICATOR.install(rgb);
    BUTTONS.install(pins.buttons);

    let _tick = TickTimer::tim7(dp.TIM7, timclk, HertzU32::from_raw(config::VELOCITY_TICK_HZ));

    // SysTick: 1 ms
    cp.SYST.set_clock_source(SystClkSource::Core);
    cp.SYST.set_reload(clocks.sysclk().raw() / 1_000 - 1);
    cp.SYST.clear_current();
    cp.SYST.enable_counter();
    cp.SYST.enable_interrupt();

    unsafe {
        NVIC::unmask(pac::Interrupt::TIM7);
        NVIC::unmask(pac::Interrupt::TIM6_DAC);
        NVIC::unmask(pac::Interrupt::EXTI1);
        NVIC::unmask(pac::Interrupt::EXTI15_10);
        NVIC::unmask(pac::Interrupt::USART1);
        NVIC::unmask(pac::Interrupt::USART2);
    }

    defmt::info!("humper: running");

    loop {
        while let Some(frame) = FRAMES.pop() {
            link.write_frame(&frame);
        }
        while let Some(b) = TYPED.pop() {
            console.write_byte(b);
        }
        while let Some(report) = REPORTS.pop() {
            let _ = write!(console, "{}\r\n", report);
        }
        cortex_m::asm::wfi();
    }
}

/// Give the servos time to reach a new stance before the next ranging cycle.
fn settle() {
    RANGER.with(|r| r.hold());
    RANGE_COUNTDOWN.store(config::SERVO_SETTLE_MS, Ordering::Relaxed);
}

#[interrupt]
fn TIM7() {
    TickTimer::clear_interrupt();
    MOTOR.with(|m| {
        let sample = m.encoder.sample();
        if let Err(e) = m.controller.on_encoder_tick(sample) {
            defmt::warn!("motor: {}", e);
        }
    });
}

#[exception]
fn SysTick() {
    if let Some(Some(RangeError::Timeout)) = RANGER.with(|r| r.check_timeout()) {
        REPORTS.push(Report::NoReading);
    }

    let left = RANGE_COUNTDOWN.load(Ordering::Relaxed);
    if left > 1 {
        RANGE_COUNTDOWN.store(left - 1, Ordering::Relaxed);
        return;
    }
    RANGE_COUNTDOWN.store(config::SERVO_SETTLE_MS, Ordering::Relaxed);
    RANGER.with(|r| {
        r.request();
        if let Err(e) = r.poll_trigger() {
            defmt::warn!("ranger: {}", e);
        }
    });
}

#[interrupt]
fn TIM6_DAC() {
    PulseClock::clear_interrupt();
    if let Some(Err(e)) = RANGER.with(|r| r.on_pulse_elapsed()) {
        defmt::warn!("ranger: {}", e);
    }
}

#[interrupt]
fn EXTI1() {
    exti::clear(ECHO_LINE);

    let echo = match RANGER.with(|r| r.on_echo_edge()) {
        Some(Ok(Some(echo))) => echo,
        Some(Err(e)) => {
            defmt::warn!("ranger: {}", e);
            return;
        }
        _ => return,
    };

    if let Some(frame) = ROBOT.with(|h| h.record_change(echo.change)) {
        FRAMES.push(frame);
    }
    INDICATOR.with(|i| {
        if i.signal() != Signal::Terminate {
            i.show(Signal::Off);
        }
    });
    REPORTS.push(Report::from(echo));
}

#[interrupt]
fn EXTI15_10() {
    if exti::is_pending(SW1_LINE) {
        exti::clear(SW1_LINE);
        if BUTTONS.with(|b| b.sw1.is_low()).unwrap_or(false) {
            settle();
            INDICATOR.with(|i| i.show(Signal::Invert));
            if let Some(Err(e)) = ROBOT.with(|h| h.invert()) {
                defmt::warn!("legs: {}", e);
            }
        }
    }

    if exti::is_pending(SW2_LINE) {
        exti::clear(SW2_LINE);
        if BUTTONS.with(|b| b.sw2.is_low()).unwrap_or(false) {
            settle();
            INDICATOR.with(|i| i.show(Signal::Terminate));
            if let Some(frame) = ROBOT.with(|h| h.terminate()) {
                FRAMES.push(frame);
            }
        }
    }
}

#[interrupt]
fn USART2() {
    let mut bytes: Vec<u8, 8> = Vec::new();
    LINK.with(|link| {
        while let Some(b) = link.read_byte() {
            if bytes.is_full() {
                bytes.remove(0);
            }
            let _ = bytes.push(b);
        }
    });
    if bytes.is_empty() {
        return;
    }

    settle();
    INDICATOR.with(|i| i.show(Signal::Command));
    if let Some(Err(e)) = ROBOT.with(|h| h.apply_commands(&bytes)) {
        defmt::warn!("legs: {}", e);
    }
}

#[interrupt]
fn USART1() {
    let setpoint = CONSOLE
        .with(|c| {
            let mut latest = None;
            while let Some(b) = c.rx.read_byte() {
                TYPED.push(b);
                if let Some(tenths) = c.parser.push(b) {
                    TYPED.push(b'\r');
                    TYPED.push(b'\n');
                    latest = Some(tenths);
                }
            }
            latest
        })
        .flatten();

    if let Some(tenths) = setpoint {
        MOTOR.with(|m| {
            m.controller
                .set_target_tenths(config::CENTER_POSITION, tenths)
        });
        REPORTS.push(Report::Setpoint(tenths));
    }
}
