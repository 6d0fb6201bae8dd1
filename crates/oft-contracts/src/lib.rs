pub mod artifact;
pub mod create2;
pub mod options;

use alloy::sol;

pub use artifact::{ArtifactError, TokenArtifact};
pub use IDeterministicFactory::IDeterministicFactoryInstance;
pub use IOFT::{EnforcedOptionParam, IOFTInstance, MessagingFee, SendParam};

sol! {
    #[sol(rpc, all_derives)]
    interface IOFT {
        struct SendParam {
            uint32 dstEid;
            bytes32 to;
            uint256 amountLD;
            uint256 minAmountLD;
            bytes extraOptions;
            bytes composeMsg;
            bytes oftCmd;
        }

        struct MessagingFee {
            uint256 nativeFee;
            uint256 lzTokenFee;
        }

        struct MessagingReceipt {
            bytes32 guid;
            uint64 nonce;
            MessagingFee fee;
        }

        struct OFTReceipt {
            uint256 amountSentLD;
            uint256 amountReceivedLD;
        }

        struct EnforcedOptionParam {
            uint32 eid;
            uint16 msgType;
            bytes options;
        }

        function setPeer(uint32 _eid, bytes32 _peer) external;

        function setEnforcedOptions(EnforcedOptionParam[] calldata _enforcedOptions) external;

        function quoteSend(SendParam calldata _sendParam, bool _payInLzToken) external view returns (MessagingFee memory);

        function send(SendParam calldata _sendParam, MessagingFee calldata _fee, address _refundAddress) external payable returns (MessagingReceipt memory, OFTReceipt memory);
    }
}

sol! {
    #[sol(rpc, all_derives)]
    interface IDeterministicFactory {
        function deploy(bytes memory bytecode, bytes32 salt) external returns (address);

        function computeAddress(bytes32 salt, bytes32 bytecodeHash) external view returns (address);
    }
}
