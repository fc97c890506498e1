use vcpu::{AddressRegisterName, ByteRegisterName, Cpu, StepOutcome};

fn run(source: &str) -> Cpu {
    let asm = vasm::assemble_str(source).expect("assembly failed");
    let mut cpu = Cpu::new(asm.program, asm.memory, asm.labels);
    loop {
        match cpu.step().expect("step failed") {
            StepOutcome::Continued => {}
            StepOutcome::EndOfProgram => break,
        }
    }
    cpu
}

#[test]
fn move_and_load() {
    let cpu = run("LDI A, 0x2A\nMOV B, A\n");
    assert_eq!(cpu.byte_register(ByteRegisterName::A), 0x2A);
    assert_eq!(cpu.byte_register(ByteRegisterName::B), 0x2A);
    assert!(!cpu.flags().zero);
    assert_eq!(cpu.pc(), 2);
}

#[test]
fn memory_round_trip() {
    let cpu = run(".byte 0x010 99\nLDI X, 0x010\nRDM A, X\nINC X\nWRM X, A\n");
    assert_eq!(cpu.memory_read(0x10).unwrap(), 99);
    assert_eq!(cpu.memory_read(0x11).unwrap(), 99);
    assert_eq!(cpu.address_register(AddressRegisterName::X), 0x11);
    assert_eq!(cpu.byte_register(ByteRegisterName::A), 99);
}

#[test]
fn conditional_loop_countdown() {
    let cpu = run("LDI A, 0x03\nloop:\nSUBI A, A, 1\nCMPI A, 0\nJNZ loop\n");
    assert_eq!(cpu.byte_register(ByteRegisterName::A), 0);
    assert!(cpu.flags().zero);
    assert!(cpu.flags().negative);
}

#[test]
fn jump_on_negative() {
    let cpu = run(
        "LDI A, 0x01\nLDI B, 0x02\nCMP A, B\nJNE neg\nLDI C, 0xAA\nneg:\nLDI D, 0xBB\n",
    );
    assert_eq!(cpu.byte_register(ByteRegisterName::C), 0);
    assert_eq!(cpu.byte_register(ByteRegisterName::D), 0xBB);
}

#[test]
fn bitwise_zero_flag_leaves_negative_untouched() {
    let cpu = run("LDI A, 0xF0\nLDI B, 0x0F\nANDL C, A, B\n");
    assert_eq!(cpu.byte_register(ByteRegisterName::C), 0);
    assert!(cpu.flags().zero);
}

#[test]
fn list_directive_writes_first_element_at_highest_valid_address() {
    let asm = vasm::assemble_str(".list 1 0x3FF 7\n").unwrap();
    assert_eq!(asm.memory.read(0x3FF).unwrap(), 7);
}

#[test]
fn list_directive_overflowing_memory_is_rejected_at_assembly_time() {
    let err = vasm::assemble_str(".list 2 0x3FF 1 2\n").unwrap_err();
    assert_eq!(err.line(), 1);
}

#[test]
fn add_boundary_wraps_to_zero() {
    let cpu = run("LDI A, 0xFF\nLDI B, 0x01\nADD C, A, B\n");
    assert_eq!(cpu.byte_register(ByteRegisterName::C), 0);
    assert!(cpu.flags().zero);
}

#[test]
fn subi_boundary_wraps_to_255() {
    let cpu = run("SUBI A, A, 1\n");
    assert_eq!(cpu.byte_register(ByteRegisterName::A), 255);
}

#[test]
fn lsl_boundary_shifts_into_top_bit() {
    let cpu = run("LDI A, 1\nLSL A, A, 7\n");
    assert_eq!(cpu.byte_register(ByteRegisterName::A), 128);
}

#[test]
fn inv_twice_is_identity() {
    let cpu = run("LDI A, 0x2A\nINV A\nINV A\n");
    assert_eq!(cpu.byte_register(ByteRegisterName::A), 0x2A);
}

#[test]
fn shift_sets_zero_flag_from_result() {
    let cpu = run("LDI A, 0x01\nLSL B, A, 3\n");
    assert_eq!(cpu.byte_register(ByteRegisterName::B), 0x08);
    assert!(!cpu.flags().zero);
}
