// ABOUTME: Built-in demonstration programs run via the --examples flag

pub struct Demo {
    pub title: &'static str,
    pub source: &'static str,
}

pub const DEMOS: &[Demo] = &[
    Demo {
        title: "Variables and functions",
        source: concat!(
            "let name = \"Ada\"\n",
            "let age = 28\n",
            "fn greet(person)\n",
            "    print(\"Hello, \" + person + \"!\")\n",
            "end\n",
            "greet(name)\n",
        ),
    },
    Demo {
        title: "Lists and iteration",
        source: concat!(
            "let numbers = [1, 2, 3, 4, 5]\n",
            "print(\"numbers:\", numbers)\n",
            "for n in numbers\n",
            "    print(n * 2)\n",
            "end\n",
        ),
    },
    Demo {
        title: "Lambdas and higher-order functions",
        source: concat!(
            "let numbers = [1, 2, 3, 4, 5]\n",
            "let double = fn(x) => x * 2\n",
            "let squares = map(numbers, fn(n) => n * n)\n",
            "print(\"doubled:\", map(numbers, double))\n",
            "print(\"squares:\", squares)\n",
            "let evens = filter(numbers, fn(n) => n % 2 == 0)\n",
            "print(\"evens:\", evens)\n",
        ),
    },
    Demo {
        title: "Recursive fibonacci",
        source: concat!(
            "fn fibonacci(n)\n",
            "    if n < 2\n",
            "        return n\n",
            "    end\n",
            "    return fibonacci(n - 1) + fibonacci(n - 2)\n",
            "end\n",
            "print(\"fibonacci(10) =\", fibonacci(10))\n",
        ),
    },
    Demo {
        title: "Classes and OOP",
        source: concat!(
            "class Person\n",
            "    fn __init__(name, age)\n",
            "        self.name = name\n",
            "        self.age = age\n",
            "    end\n",
            "    fn greet()\n",
            "        print(\"Hi, I'm \" + self.name + \" and I'm \" + str(self.age) + \" years old\")\n",
            "    end\n",
            "    fn birthday()\n",
            "        self.age += 1\n",
            "        print(\"Happy birthday! Now I'm \" + str(self.age))\n",
            "    end\n",
            "end\n",
            "let p = new Person(\"Ada\", 28)\n",
            "p.greet()\n",
            "p.birthday()\n",
        ),
    },
];
