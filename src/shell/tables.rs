//! Stock command tables for both protocol profiles.

use super::registry::{Action, CommandTable};
use crate::error::OpwireError;
use crate::protocol::{Command, DeviceOpcode};

/// Commands for the message protocol: `send`, `close`, `shutdown`.
pub fn message_commands() -> CommandTable<Command> {
    let mut table = CommandTable::new();
    table
        .register("send", "Send a text message: send <text>", |args| {
            if args.is_empty() {
                return Err(OpwireError::InvalidArguments(
                    "send requires a message".to_string(),
                ));
            }
            Ok(Action::Send(Command::message_text(args)))
        })
        .register("close", "Close the connection and exit.", |_| {
            Ok(Action::SendAndQuit(Command::close_connection()))
        })
        .register("shutdown", "Shut the server down and exit.", |_| {
            Ok(Action::SendAndQuit(Command::shutdown()))
        });
    table
}

/// Commands for the device-toggle protocol, one per light state plus `exit`.
pub fn device_commands() -> CommandTable<DeviceOpcode> {
    const TOGGLES: [(&str, &str, DeviceOpcode); 6] = [
        ("green_on", "Turn on the green light.", DeviceOpcode::GreenOn),
        ("green_off", "Turn off the green light.", DeviceOpcode::GreenOff),
        ("red_on", "Turn on the red light.", DeviceOpcode::RedOn),
        ("red_off", "Turn off the red light.", DeviceOpcode::RedOff),
        ("yellow_on", "Turn on the yellow light.", DeviceOpcode::YellowOn),
        ("yellow_off", "Turn off the yellow light.", DeviceOpcode::YellowOff),
    ];

    let mut table = CommandTable::new();
    for (name, help, opcode) in TOGGLES {
        table.register(name, help, move |_| Ok(Action::Send(opcode)));
    }
    table.register("exit", "Close the connection and exit the client.", |_| {
        Ok(Action::SendAndQuit(DeviceOpcode::CloseConnection))
    });
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::MessageOpcode;

    #[test]
    fn test_message_send() {
        let table = message_commands();
        let action = table.dispatch("send Hello, Server!").unwrap().unwrap();
        assert_eq!(action, Action::Send(Command::message_text("Hello, Server!")));
    }

    #[test]
    fn test_message_send_requires_text() {
        let err = message_commands().dispatch("send   ").unwrap_err();
        assert!(matches!(err, OpwireError::InvalidArguments(_)));
    }

    #[test]
    fn test_message_quit_commands() {
        let table = message_commands();
        let Some(Action::SendAndQuit(close)) = table.dispatch("close").unwrap() else {
            panic!("close should send and quit");
        };
        assert_eq!(close.opcode(), MessageOpcode::CloseConnection);

        let Some(Action::SendAndQuit(shutdown)) = table.dispatch("shutdown").unwrap() else {
            panic!("shutdown should send and quit");
        };
        assert_eq!(shutdown.opcode(), MessageOpcode::Shutdown);
        assert!(shutdown.message().is_empty());
    }

    #[test]
    fn test_device_toggles() {
        let table = device_commands();
        let expected = [
            ("green_on", 0x04),
            ("green_off", 0x05),
            ("red_on", 0x06),
            ("red_off", 0x07),
            ("yellow_on", 0x08),
            ("yellow_off", 0x09),
        ];
        for (name, byte) in expected {
            let Some(Action::Send(opcode)) = table.dispatch(name).unwrap() else {
                panic!("{} should send", name);
            };
            assert_eq!(opcode.as_u8(), byte);
        }
    }

    #[test]
    fn test_device_exit_sends_close() {
        assert_eq!(
            device_commands().dispatch("exit").unwrap(),
            Some(Action::SendAndQuit(DeviceOpcode::CloseConnection))
        );
    }

    #[test]
    fn test_device_table_names() {
        assert_eq!(
            device_commands().names(),
            vec!["exit", "green_off", "green_on", "red_off", "red_on", "yellow_off", "yellow_on"]
        );
    }
}
