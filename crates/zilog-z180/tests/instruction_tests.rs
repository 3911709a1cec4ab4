//! Instruction-level tests for the Z180 core.
//!
//! Each test drives the core the way a dispatcher would: set up registers
//! and memory, call the operation, check the architectural result.

use emu_core::{Bus, IoBus, Observable, SimpleBus, Value};
use zilog_z180::{
    CF, Condition, HF, HaltState, NF, Outcome, PF, Pair, SF, VF, XF, YF, Z180, Z180Bus, ZF,
    flags::parity,
};

/// Bus that counts RETI notifications and internal register traffic.
struct TestBus {
    inner: SimpleBus,
    reti_count: usize,
    internal_writes: Vec<(u8, u8)>,
}

impl TestBus {
    fn new() -> Self {
        Self {
            inner: SimpleBus::new(),
            reti_count: 0,
            internal_writes: Vec::new(),
        }
    }
}

impl Bus for TestBus {
    fn read(&mut self, address: u32) -> u8 {
        self.inner.read(address)
    }

    fn write(&mut self, address: u32, value: u8) {
        self.inner.write(address, value);
    }
}

impl IoBus for TestBus {
    fn read_io(&mut self, port: u16) -> u8 {
        self.inner.read_io(port)
    }

    fn write_io(&mut self, port: u16, value: u8) {
        self.inner.write_io(port, value);
    }
}

impl Z180Bus for TestBus {
    fn read_opcode(&mut self, address: u32) -> u8 {
        // Opcode space is inverted so tests can tell the paths apart
        !self.inner.read(address)
    }

    fn read_internal(&mut self, reg: u8) -> u8 {
        0x80 | reg
    }

    fn write_internal(&mut self, reg: u8, value: u8) {
        self.internal_writes.push((reg, value));
    }

    fn reti(&mut self) {
        self.reti_count += 1;
    }
}

fn cpu_at(pc: u16) -> Z180 {
    let mut cpu = Z180::new();
    cpu.set_pc(pc);
    cpu.set_sp(0xF000);
    cpu
}

// ---------------------------------------------------------------------------
// ALU
// ---------------------------------------------------------------------------

#[test]
fn test_daa_0x9a_wraps_with_carry() {
    let mut cpu = cpu_at(0);
    cpu.regs_mut().a = 0x9A;
    cpu.regs_mut().f = 0;
    cpu.daa();
    assert_eq!(cpu.regs().a, 0x00);
    assert_ne!(cpu.regs().f & CF, 0);
    assert_ne!(cpu.regs().f & ZF, 0);
}

#[test]
fn test_bcd_addition_sequence() {
    let mut cpu = cpu_at(0);
    cpu.regs_mut().a = 0x58;
    cpu.add(0x46);
    cpu.daa();
    // 58 + 46 = 104 decimal
    assert_eq!(cpu.regs().a, 0x04);
    assert_ne!(cpu.regs().f & CF, 0);
}

#[test]
fn test_sbc_chain_borrows() {
    let mut cpu = cpu_at(0);
    cpu.regs_mut().a = 0x00;
    cpu.regs_mut().f = CF;
    cpu.sbc(0x00);
    assert_eq!(cpu.regs().a, 0xFF);
    assert_eq!(cpu.regs().f, SF | YF | HF | XF | NF | CF);
}

#[test]
fn test_neg() {
    let mut cpu = cpu_at(0);
    cpu.regs_mut().a = 0x01;
    cpu.neg();
    assert_eq!(cpu.regs().a, 0xFF);
    assert_eq!(cpu.regs().f & (NF | CF), NF | CF);
}

#[test]
fn test_rotate_accumulator_keeps_szp() {
    let mut cpu = cpu_at(0);
    cpu.regs_mut().a = 0x80;
    cpu.regs_mut().f = SF | ZF | PF;
    cpu.rla();
    assert_eq!(cpu.regs().a, 0x00);
    assert_eq!(cpu.regs().f, SF | ZF | PF | CF);
    cpu.rra();
    assert_eq!(cpu.regs().a, 0x80);
    assert_eq!(cpu.regs().f, SF | ZF | PF);
}

// ---------------------------------------------------------------------------
// 16-bit arithmetic
// ---------------------------------------------------------------------------

#[test]
fn test_add16_does_not_touch_zero() {
    let mut cpu = cpu_at(0);
    cpu.regs_mut().set_hl(0xFFFF);
    cpu.regs_mut().set_de(0x0001);
    cpu.regs_mut().f = 0;
    cpu.add16(Pair::HL, Pair::DE);
    assert_eq!(cpu.regs().hl(), 0x0000);
    assert_eq!(cpu.regs().f, HF | CF);
}

#[test]
fn test_sbc16_zero_result() {
    let mut cpu = cpu_at(0);
    cpu.regs_mut().set_hl(0x1234);
    cpu.regs_mut().set_de(0x1234);
    cpu.regs_mut().f = 0;
    cpu.sbc16(Pair::DE);
    assert_eq!(cpu.regs().hl(), 0);
    assert_eq!(cpu.regs().f, ZF | NF);
}

#[test]
fn test_mlt_hl() {
    let mut cpu = cpu_at(0);
    cpu.regs_mut().set_hl(0x0C0A);
    cpu.mlt(Pair::HL);
    assert_eq!(cpu.regs().hl(), 120);
}

// ---------------------------------------------------------------------------
// MMU and access shim
// ---------------------------------------------------------------------------

#[test]
fn test_mmu_bank_and_common_areas() {
    let mut cpu = cpu_at(0);
    let mut bus = SimpleBus::new();
    // Bank base 0, common base 8
    cpu.output(&mut bus, 0x003A, 0x80);
    cpu.output(&mut bus, 0x0039, 0x05);
    cpu.output(&mut bus, 0x0038, 0x0A);

    for page in 0..8u16 {
        let logical = page << 12;
        assert_eq!(cpu.mmu().translate(logical), 0x05000 + u32::from(page) * 0x1000);
    }
    for page in 8..16u16 {
        let logical = page << 12;
        assert_eq!(cpu.mmu().translate(logical), (0x0A << 12) + (u32::from(page) << 12));
    }

    // Reprogramming BBR takes effect on the next access
    cpu.output(&mut bus, 0x0039, 0x06);
    assert_eq!(cpu.mmu().translate(0x1234), 0x07234);
    assert_eq!(cpu.mmu().translate(0x9234), 0x13234);

    cpu.wm(&mut bus, 0x0010, 0x77);
    assert_eq!(bus.peek(0x06010), 0x77);
}

#[test]
fn test_opcode_and_argument_paths_are_separate() {
    let mut cpu = cpu_at(0x0200);
    let mut bus = TestBus::new();
    bus.inner.load(0x0200, &[0x0F, 0x34, 0x12]);
    assert_eq!(cpu.rop(&mut bus), 0xF0);
    assert_eq!(cpu.arg16(&mut bus), 0x1234);
    assert_eq!(cpu.pc(), 0x0203);
}

#[test]
fn test_internal_registers_reach_the_host() {
    let mut cpu = cpu_at(0);
    let mut bus = TestBus::new();
    cpu.output(&mut bus, 0x0010, 0x42);
    assert_eq!(bus.internal_writes, vec![(0x10, 0x42)]);
    assert_eq!(cpu.input(&mut bus, 0x0004), 0x84);
    // Owned registers never reach the host
    cpu.output(&mut bus, 0x003A, 0x48);
    assert_eq!(bus.internal_writes.len(), 1);
    assert!(bus.inner.io_log().is_empty());
}

// ---------------------------------------------------------------------------
// Control flow
// ---------------------------------------------------------------------------

#[test]
fn test_reti_notifies_once_and_keeps_iff1() {
    let mut cpu = cpu_at(0x0038);
    let mut bus = TestBus::new();
    cpu.push_word(&mut bus, 0x0456);
    cpu.regs_mut().iff1 = false;
    cpu.regs_mut().iff2 = true;
    cpu.reti(&mut bus);
    assert_eq!(bus.reti_count, 1);
    assert_eq!(cpu.pc(), 0x0456);
    assert!(!cpu.regs().iff1);
}

#[test]
fn test_conditional_costs() {
    let mut cpu = cpu_at(0x0100);
    let mut bus = SimpleBus::new();
    bus.load(0x0100, &[0x10]);
    cpu.regs_mut().f = ZF;
    let outcome = cpu.jr_cond(&mut bus, Condition::Z);
    assert_eq!(outcome, Outcome::Taken);
    assert_eq!(outcome.cycles(6, 2), 8);
    assert_eq!(cpu.pc(), 0x0111);
}

// ---------------------------------------------------------------------------
// Exchange
// ---------------------------------------------------------------------------

#[test]
fn test_exx_twice_restores() {
    let mut cpu = cpu_at(0);
    cpu.regs_mut().set_bc(0x1111);
    cpu.regs_mut().set_de(0x2222);
    cpu.regs_mut().set_hl(0x3333);
    cpu.regs_mut().b_alt = 0xAA;
    cpu.exx();
    assert_eq!(cpu.regs().b, 0xAA);
    assert_eq!(cpu.query("bc'"), Some(Value::U16(0x1111)));
    cpu.exx();
    assert_eq!(cpu.regs().bc(), 0x1111);
    assert_eq!(cpu.regs().de(), 0x2222);
    assert_eq!(cpu.regs().hl(), 0x3333);
    assert_eq!(cpu.regs().b_alt, 0xAA);
}

// ---------------------------------------------------------------------------
// Block instructions
// ---------------------------------------------------------------------------

#[test]
fn test_ldir_three_iterations() {
    let mut cpu = cpu_at(0x0102); // just after ED B0 at 0x0100
    let mut bus = SimpleBus::new();
    bus.load(0x1000, &[0x11, 0x22, 0x33]);
    cpu.regs_mut().set_hl(0x1000);
    cpu.regs_mut().set_de(0x2000);
    cpu.regs_mut().set_bc(3);

    let mut iterations = 0;
    let mut overflow = Vec::new();
    loop {
        let outcome = cpu.ldir(&mut bus);
        iterations += 1;
        overflow.push(cpu.regs().f & VF != 0);
        if !outcome.taken() {
            break;
        }
        assert_eq!(cpu.pc(), 0x0100);
        cpu.set_pc(0x0102);
    }

    assert_eq!(iterations, 3);
    assert_eq!(overflow, vec![true, true, false]);
    assert_eq!(cpu.regs().bc(), 0);
    assert_eq!(cpu.regs().hl(), 0x1003);
    assert_eq!(cpu.regs().de(), 0x2003);
    assert_eq!(cpu.pc(), 0x0102);
    assert_eq!(
        [bus.peek(0x2000), bus.peek(0x2001), bus.peek(0x2002)],
        [0x11, 0x22, 0x33]
    );
}

#[test]
fn test_lddr_moves_down() {
    let mut cpu = cpu_at(0x0102);
    let mut bus = SimpleBus::new();
    bus.load(0x1000, &[0x11, 0x22]);
    cpu.regs_mut().set_hl(0x1001);
    cpu.regs_mut().set_de(0x2001);
    cpu.regs_mut().set_bc(2);
    assert!(cpu.lddr(&mut bus).taken());
    cpu.set_pc(0x0102);
    assert!(!cpu.lddr(&mut bus).taken());
    assert_eq!(cpu.regs().hl(), 0x0FFF);
    assert_eq!(cpu.regs().de(), 0x1FFF);
    assert_eq!(bus.peek(0x2000), 0x11);
    assert_eq!(bus.peek(0x2001), 0x22);
}

#[test]
fn test_inir_repeats_on_b() {
    let mut cpu = cpu_at(0x0102);
    let mut bus = SimpleBus::new();
    bus.set_port(0x0250, 0x5A);
    bus.set_port(0x0150, 0xA5);
    cpu.regs_mut().set_bc(0x0250);
    cpu.regs_mut().set_hl(0x3000);
    assert_eq!(cpu.inir(&mut bus), Outcome::Taken);
    cpu.set_pc(0x0102);
    assert_eq!(cpu.inir(&mut bus), Outcome::Fallthrough);
    assert_eq!(bus.peek(0x3000), 0x5A);
    assert_eq!(bus.peek(0x3001), 0xA5);
    assert_ne!(cpu.regs().f & ZF, 0);
}

#[test]
fn test_indr_fills_downward() {
    let mut cpu = cpu_at(0x0102);
    let mut bus = SimpleBus::new();
    bus.set_port(0x0240, 0x11);
    bus.set_port(0x0140, 0x22);
    cpu.regs_mut().set_bc(0x0240);
    cpu.regs_mut().set_hl(0x3001);
    assert_eq!(cpu.indr(&mut bus), Outcome::Taken);
    assert_eq!(cpu.pc(), 0x0100);
    cpu.set_pc(0x0102);
    assert_eq!(cpu.indr(&mut bus), Outcome::Fallthrough);
    assert_eq!(cpu.pc(), 0x0102);
    assert_eq!(bus.peek(0x3001), 0x11);
    assert_eq!(bus.peek(0x3000), 0x22);
    assert_eq!(cpu.regs().hl(), 0x2FFF);
    assert_eq!(cpu.regs().b, 0);
    assert_ne!(cpu.regs().f & ZF, 0);
}

#[test]
fn test_otdr_sends_downward_on_decremented_port() {
    let mut cpu = cpu_at(0x0102);
    let mut bus = SimpleBus::new();
    bus.load(0x3000, &[0xAA, 0xBB]);
    cpu.regs_mut().set_bc(0x0210);
    cpu.regs_mut().set_hl(0x3001);
    assert_eq!(cpu.otdr(&mut bus), Outcome::Taken);
    cpu.set_pc(0x0102);
    assert_eq!(cpu.otdr(&mut bus), Outcome::Fallthrough);
    assert_eq!(bus.io_log(), &[(0x0110, 0xBB), (0x0010, 0xAA)]);
    assert_eq!(cpu.regs().hl(), 0x2FFF);
    assert_ne!(cpu.regs().f & ZF, 0);
}

/// P/V after INI/IND/OUTI/OUTD: parity of the low three bits of
/// `C ± 1 + io` combined with B after the decrement.
fn expected_block_io_parity(c: u8, io: u8, b_after: u8, up: bool) -> bool {
    let k = if up {
        c.wrapping_add(1).wrapping_add(io)
    } else {
        c.wrapping_sub(1).wrapping_add(io)
    };
    parity((k & 7) ^ b_after)
}

#[test]
fn test_ini_outi_parity_golden_vectors() {
    for b_after in [0u8, 1] {
        for c in 0x40..0x48u8 {
            for io in 0..8u8 {
                // INI reads port BC before B is decremented
                let mut cpu = cpu_at(0);
                let mut bus = SimpleBus::new();
                cpu.regs_mut().b = b_after + 1;
                cpu.regs_mut().c = c;
                cpu.regs_mut().set_hl(0x4000);
                bus.set_port(cpu.regs().bc(), io);
                cpu.ini(&mut bus);
                assert_eq!(cpu.regs().b, b_after);
                assert_eq!(bus.peek(0x4000), io);
                assert_eq!(
                    cpu.regs().f & PF != 0,
                    expected_block_io_parity(c, io, b_after, true),
                    "INI c={c:#04X} io={io} b={b_after}"
                );

                // OUTI writes port BC after B is decremented
                let mut cpu = cpu_at(0);
                let mut bus = SimpleBus::new();
                cpu.regs_mut().b = b_after + 1;
                cpu.regs_mut().c = c;
                cpu.regs_mut().set_hl(0x4000);
                bus.load(0x4000, &[io]);
                cpu.outi(&mut bus);
                assert_eq!(bus.io_log(), &[(u16::from(b_after) << 8 | u16::from(c), io)]);
                assert_eq!(
                    cpu.regs().f & PF != 0,
                    expected_block_io_parity(c, io, b_after, true),
                    "OUTI c={c:#04X} io={io} b={b_after}"
                );
                assert_eq!(cpu.regs().f & ZF != 0, b_after == 0);
            }
        }
    }
}

#[test]
fn test_ind_outd_parity_golden_vectors() {
    for b_after in [0u8, 1, 0x7F, 0xFE] {
        for c in 0x40..0x48u8 {
            for io in [0x00u8, 0x01, 0x02, 0x03, 0x84, 0xFD, 0xFE, 0xFF] {
                let mut cpu = cpu_at(0);
                let mut bus = SimpleBus::new();
                cpu.regs_mut().b = b_after.wrapping_add(1);
                cpu.regs_mut().c = c;
                cpu.regs_mut().set_hl(0x4000);
                bus.set_port(cpu.regs().bc(), io);
                cpu.ind(&mut bus);
                assert_eq!(
                    cpu.regs().f & PF != 0,
                    expected_block_io_parity(c, io, b_after, false),
                    "IND c={c:#04X} io={io:#04X} b={b_after}"
                );
                assert_eq!(cpu.regs().f & NF != 0, io & 0x80 != 0);

                let mut cpu = cpu_at(0);
                let mut bus = SimpleBus::new();
                cpu.regs_mut().b = b_after.wrapping_add(1);
                cpu.regs_mut().c = c;
                cpu.regs_mut().set_hl(0x4000);
                bus.load(0x4000, &[io]);
                cpu.outd(&mut bus);
                assert_eq!(
                    cpu.regs().f & PF != 0,
                    expected_block_io_parity(c, io, b_after, false),
                    "OUTD c={c:#04X} io={io:#04X} b={b_after}"
                );
                assert_eq!(cpu.regs().hl(), 0x3FFF);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Interrupts, HALT and SLEEP
// ---------------------------------------------------------------------------

#[test]
fn test_ei_delays_acceptance_by_one_instruction() {
    let mut cpu = cpu_at(0x0100);
    let mut bus = SimpleBus::new();

    // EI executes
    cpu.begin_instruction();
    cpu.ei();
    assert!(cpu.regs().iff1 && cpu.regs().iff2);
    assert!(!cpu.accepts_interrupt());

    // The following instruction runs to completion
    cpu.begin_instruction();
    cpu.regs_mut().a = 0x01;
    assert!(cpu.accepts_interrupt());

    cpu.im(1);
    cpu.accept_interrupt(&mut bus, 0xFF);
    assert_eq!(cpu.pc(), 0x0038);
    assert!(!cpu.accepts_interrupt());
}

#[test]
fn test_di_blocks_interrupts() {
    let mut cpu = cpu_at(0);
    cpu.ei();
    cpu.begin_instruction();
    cpu.di();
    assert!(!cpu.accepts_interrupt());
}

#[test]
fn test_halt_then_nmi() {
    let mut cpu = cpu_at(0x0201);
    let mut bus = SimpleBus::new();
    cpu.halt();
    assert_eq!(cpu.query("halt"), Some(Value::Str("halted")));
    assert_eq!(cpu.pc(), 0x0200);
    cpu.nmi(&mut bus);
    assert_eq!(cpu.regs().halt, HaltState::Running);
    assert_eq!(cpu.pc(), 0x0066);
    assert_eq!(cpu.pop_word(&mut bus), 0x0201);
}

#[test]
fn test_sleep_yields_to_scheduler() {
    let mut cpu = cpu_at(0x0302);
    cpu.set_budget(500);
    cpu.charge(12);
    cpu.slp();
    assert_eq!(cpu.budget(), 0);
    assert!(cpu.is_halted());
    assert_eq!(cpu.query("halt"), Some(Value::Str("sleeping")));
}

#[test]
fn test_nmi_wakes_sleep_past_slp() {
    let mut cpu = cpu_at(0x0302); // just after ED 76 at 0x0300
    let mut bus = SimpleBus::new();
    cpu.slp();
    cpu.nmi(&mut bus);
    assert_eq!(cpu.regs().halt, HaltState::Running);
    assert_eq!(cpu.pc(), 0x0066);
    assert_eq!(cpu.pop_word(&mut bus), 0x0303);
}
