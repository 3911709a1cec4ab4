//! Property-based tests for Z180 core invariants.

use emu_core::SimpleBus;
use proptest::prelude::*;
use zilog_z180::flags::tables;
use zilog_z180::{CF, Mmu, NF, PF, Pair, SF, VF, XF, YF, Z180, ZF};

proptest! {
    #[test]
    fn szp_matches_its_definition(v in any::<u8>()) {
        let f = tables().szp[v as usize];
        prop_assert_eq!(f & ZF != 0, v == 0);
        prop_assert_eq!(f & SF != 0, v & 0x80 != 0);
        prop_assert_eq!(f & PF != 0, v.count_ones() % 2 == 0);
    }

    #[test]
    fn add_then_sub_restores_a(a in any::<u8>(), b in any::<u8>()) {
        let mut cpu = Z180::new();
        cpu.regs_mut().a = a;
        cpu.add(b);
        let add_carry = cpu.regs().f & CF != 0;
        cpu.sub(b);
        prop_assert_eq!(cpu.regs().a, a);
        // Subtracting b back borrows exactly when the add wrapped
        prop_assert_eq!(cpu.regs().f & CF != 0, add_carry);
        prop_assert!(cpu.regs().f & NF != 0);
    }

    #[test]
    fn cp_matches_sub_without_storing(a in any::<u8>(), b in any::<u8>()) {
        let mut cmp = Z180::new();
        cmp.regs_mut().a = a;
        cmp.cp(b);

        let mut sub = Z180::new();
        sub.regs_mut().a = a;
        sub.sub(b);

        prop_assert_eq!(cmp.regs().a, a);
        prop_assert_eq!(cmp.regs().f, sub.regs().f);
    }

    #[test]
    fn inc_dec_round_trip_keeps_carry(v in any::<u8>(), carry in any::<bool>()) {
        let mut cpu = Z180::new();
        cpu.regs_mut().f = if carry { CF } else { 0 };
        let up = cpu.inc(v);
        let back = cpu.dec(up);
        prop_assert_eq!(back, v);
        prop_assert_eq!(cpu.regs().f & CF != 0, carry);
    }

    #[test]
    fn add16_never_touches_szv(hl in any::<u16>(), bc in any::<u16>(), f in any::<u8>()) {
        let mut cpu = Z180::new();
        cpu.regs_mut().set_hl(hl);
        cpu.regs_mut().set_bc(bc);
        cpu.regs_mut().f = f;
        cpu.add16(Pair::HL, Pair::BC);
        prop_assert_eq!(cpu.regs().hl(), hl.wrapping_add(bc));
        prop_assert_eq!(cpu.regs().f & (SF | ZF | VF), f & (SF | ZF | VF));
        prop_assert_eq!(cpu.regs().f & (YF | XF | NF), 0);
    }

    #[test]
    fn exx_is_an_involution(
        main in any::<[u8; 6]>(),
        alt in any::<[u8; 6]>(),
    ) {
        let mut cpu = Z180::new();
        {
            let r = cpu.regs_mut();
            [r.b, r.c, r.d, r.e, r.h, r.l] = main;
            [r.b_alt, r.c_alt, r.d_alt, r.e_alt, r.h_alt, r.l_alt] = alt;
        }
        let before = *cpu.regs();
        cpu.exx();
        prop_assert_eq!(cpu.regs().b, alt[0]);
        prop_assert_eq!(cpu.regs().l_alt, main[5]);
        cpu.exx();
        prop_assert_eq!(*cpu.regs(), before);
    }

    #[test]
    fn translate_follows_the_area_rules(
        cbar in any::<u8>(),
        cbr in any::<u8>(),
        bbr in any::<u8>(),
        addr in any::<u16>(),
    ) {
        let mmu = Mmu::with_registers(cbar, cbr, bbr);
        let page = u32::from(addr >> 12);
        let offset = if page < u32::from(cbar & 0x0F) {
            0
        } else if page < u32::from(cbar >> 4) {
            u32::from(bbr) << 12
        } else {
            u32::from(cbr) << 12
        };
        let expected = ((page << 12) + offset) & 0xF_FFFF | u32::from(addr & 0x0FFF);
        prop_assert_eq!(mmu.translate(addr), expected);
    }

    #[test]
    fn push_pop_round_trip(sp in 2u16..=0xFFFF, value in any::<u16>()) {
        let mut cpu = Z180::new();
        let mut bus = SimpleBus::new();
        cpu.set_sp(sp);
        cpu.push_word(&mut bus, value);
        prop_assert_eq!(cpu.sp(), sp - 2);
        prop_assert_eq!(cpu.pop_word(&mut bus), value);
        prop_assert_eq!(cpu.sp(), sp);
    }
}
